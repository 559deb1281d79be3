//! Crypto engine contract for the PFS container filesystem
//!
//! PFS sector encryption and signing run on either a hardware engine or a
//! software fallback. This crate defines how callers select between them and
//! which parameters each one receives; the cipher implementations live in
//! the backends that implement [`HwCryptBackend`] and [`SwCryptBackend`].
//!
//! # Example
//!
//! ```
//! use vitapfs_crypto::{
//!     CryptEngineSelector, CryptFlags, EngineRequest, HwCryptBackend, HwCryptParams,
//!     SwCryptBackend, SwCryptParams, TweakKey,
//! };
//!
//! struct Passthrough;
//!
//! impl HwCryptBackend for Passthrough {
//!     fn encrypt(&self, _: &HwCryptParams<'_>, src: &[u8], dst: &mut [u8]) -> i32 {
//!         dst.copy_from_slice(src);
//!         0
//!     }
//!     fn decrypt(&self, _: &HwCryptParams<'_>, src: &[u8], dst: &mut [u8]) -> i32 {
//!         dst.copy_from_slice(src);
//!         0
//!     }
//! }
//!
//! impl SwCryptBackend for Passthrough {
//!     fn encrypt(&self, _: &SwCryptParams<'_>, src: &[u8], dst: &mut [u8]) -> i32 {
//!         dst.copy_from_slice(src);
//!         0
//!     }
//!     fn decrypt(&self, _: &SwCryptParams<'_>, src: &[u8], dst: &mut [u8]) -> i32 {
//!         dst.copy_from_slice(src);
//!         0
//!     }
//! }
//!
//! let selector = CryptEngineSelector::new(Passthrough, Passthrough);
//! let key = [0u8; 16];
//! let request = EngineRequest::Hardware(HwCryptParams {
//!     key: &key,
//!     iv_xor_key: &key,
//!     tweak: TweakKey::new(0, 0),
//!     block_size: 0x10,
//!     flags: CryptFlags::USE_CMAC | CryptFlags::USE_KEYGEN,
//!     key_id: 0,
//! });
//!
//! let mut out = [0u8; 0x20];
//! selector.decrypt(&request, &[0xAB; 0x20], &mut out).unwrap();
//! assert_eq!(out, [0xAB; 0x20]);
//! ```

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod flags;

pub use engine::{
    CryptEngineSelector, Direction, EngineRequest, HwCryptBackend, HwCryptParams, SwCryptBackend,
    SwCryptParams, TweakKey,
};
pub use error::CryptoError;
pub use flags::CryptFlags;
