//! Crypto engine selector
//!
//! PFS sector crypto runs on one of two engines. The hardware path addresses
//! its key material by a key identifier and takes an IV-derived XOR key; the
//! software path is given the subkey and key size directly. Both work on
//! whole cipher blocks with a two-part tweak key and report an integer
//! status, 0 on success.
//!
//! This module owns the calling convention only. Backends implement
//! [`HwCryptBackend`] and [`SwCryptBackend`]; [`CryptEngineSelector`]
//! validates a request and dispatches it to the matching backend.

use crate::error::{CryptoError, check_status};
use crate::flags::CryptFlags;
use tracing::trace;

/// Size of the hardware path key and IV XOR key in bytes
pub const HW_KEY_SIZE: usize = 16;

/// Key sizes accepted by the software path, in bits
pub const SW_KEY_SIZES: [u32; 3] = [128, 192, 256];

/// Two halves of the tweak key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TweakKey {
    /// First half
    pub key0: i32,
    /// Second half
    pub key1: i32,
}

impl TweakKey {
    /// Create a tweak key from its halves
    pub fn new(key0: i32, key1: i32) -> Self {
        Self { key0, key1 }
    }
}

/// Parameters of a hardware path operation
#[derive(Clone, Copy)]
pub struct HwCryptParams<'a> {
    /// Primary key
    pub key: &'a [u8],
    /// IV-derived XOR key
    pub iv_xor_key: &'a [u8],
    /// Tweak key halves
    pub tweak: TweakKey,
    /// Cipher block size in bytes
    pub block_size: u32,
    /// Optional CMAC / key derivation steps
    pub flags: CryptFlags,
    /// Hardware key slot identifier
    pub key_id: u16,
}

/// Parameters of a software path operation
#[derive(Clone, Copy)]
pub struct SwCryptParams<'a> {
    /// Primary key
    pub key: &'a [u8],
    /// Subkey
    pub subkey: &'a [u8],
    /// Key size in bits
    pub key_size: u32,
    /// Tweak key halves
    pub tweak: TweakKey,
    /// Cipher block size in bytes
    pub block_size: u32,
    /// Optional CMAC / key derivation steps
    pub flags: CryptFlags,
}

// Key material stays out of debug output
impl std::fmt::Debug for HwCryptParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HwCryptParams")
            .field("key_len", &self.key.len())
            .field("tweak", &self.tweak)
            .field("block_size", &self.block_size)
            .field("flags", &self.flags)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for SwCryptParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwCryptParams")
            .field("key_size", &self.key_size)
            .field("tweak", &self.tweak)
            .field("block_size", &self.block_size)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Hardware crypto backend
///
/// `src` and `dst` have equal length, a non-zero multiple of the block size.
pub trait HwCryptBackend {
    /// Encrypt `src` into `dst`, returning 0 on success
    fn encrypt(&self, params: &HwCryptParams<'_>, src: &[u8], dst: &mut [u8]) -> i32;

    /// Decrypt `src` into `dst`, returning 0 on success
    fn decrypt(&self, params: &HwCryptParams<'_>, src: &[u8], dst: &mut [u8]) -> i32;
}

/// Software crypto backend
///
/// `src` and `dst` have equal length, a non-zero multiple of the block size.
pub trait SwCryptBackend {
    /// Encrypt `src` into `dst`, returning 0 on success
    fn encrypt(&self, params: &SwCryptParams<'_>, src: &[u8], dst: &mut [u8]) -> i32;

    /// Decrypt `src` into `dst`, returning 0 on success
    fn decrypt(&self, params: &SwCryptParams<'_>, src: &[u8], dst: &mut [u8]) -> i32;
}

/// Direction of a crypto operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Plaintext to ciphertext
    Encrypt,
    /// Ciphertext to plaintext
    Decrypt,
}

/// Engine variant selected for an operation
#[derive(Debug, Clone, Copy)]
pub enum EngineRequest<'a> {
    /// Hardware path
    Hardware(HwCryptParams<'a>),
    /// Software path
    Software(SwCryptParams<'a>),
}

impl EngineRequest<'_> {
    /// Cipher block size of the request
    pub fn block_size(&self) -> u32 {
        match self {
            Self::Hardware(p) => p.block_size,
            Self::Software(p) => p.block_size,
        }
    }

    /// Flags of the request
    pub fn flags(&self) -> CryptFlags {
        match self {
            Self::Hardware(p) => p.flags,
            Self::Software(p) => p.flags,
        }
    }

    fn validate_keys(&self) -> Result<(), CryptoError> {
        match self {
            Self::Hardware(p) => {
                for len in [p.key.len(), p.iv_xor_key.len()] {
                    if len != HW_KEY_SIZE {
                        return Err(CryptoError::InvalidKeySize {
                            expected: HW_KEY_SIZE,
                            actual: len,
                        });
                    }
                }
            }
            Self::Software(p) => {
                if !SW_KEY_SIZES.contains(&p.key_size) {
                    return Err(CryptoError::UnsupportedKeySize(p.key_size));
                }
                let expected = (p.key_size / 8) as usize;
                for len in [p.key.len(), p.subkey.len()] {
                    if len != expected {
                        return Err(CryptoError::InvalidKeySize {
                            expected,
                            actual: len,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Check buffer lengths against a block size
pub fn validate_buffers(src: &[u8], dst: &[u8], block_size: u32) -> Result<(), CryptoError> {
    if block_size == 0 {
        return Err(CryptoError::InvalidBlockSize(block_size));
    }
    if src.is_empty() || src.len() != dst.len() || src.len() % block_size as usize != 0 {
        return Err(CryptoError::InvalidBufferSize {
            src: src.len(),
            dst: dst.len(),
            block_size,
        });
    }
    Ok(())
}

/// Dispatches requests to a hardware or software backend
pub struct CryptEngineSelector<H, S> {
    hardware: H,
    software: S,
}

impl<H: HwCryptBackend, S: SwCryptBackend> CryptEngineSelector<H, S> {
    /// Create a selector over two backends
    pub fn new(hardware: H, software: S) -> Self {
        Self { hardware, software }
    }

    /// Hardware backend
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Software backend
    pub fn software(&self) -> &S {
        &self.software
    }

    /// Encrypt `src` into `dst`
    pub fn encrypt(
        &self,
        request: &EngineRequest<'_>,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<(), CryptoError> {
        self.run(Direction::Encrypt, request, src, dst)
    }

    /// Decrypt `src` into `dst`
    pub fn decrypt(
        &self,
        request: &EngineRequest<'_>,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<(), CryptoError> {
        self.run(Direction::Decrypt, request, src, dst)
    }

    /// Validate a request and dispatch it to its backend
    pub fn run(
        &self,
        direction: Direction,
        request: &EngineRequest<'_>,
        src: &[u8],
        dst: &mut [u8],
    ) -> Result<(), CryptoError> {
        validate_buffers(src, dst, request.block_size())?;
        request.validate_keys()?;

        trace!(
            ?direction,
            size = src.len(),
            block_size = request.block_size(),
            flags = request.flags().bits(),
            "dispatching crypto request"
        );

        let status = match (request, direction) {
            (EngineRequest::Hardware(p), Direction::Encrypt) => self.hardware.encrypt(p, src, dst),
            (EngineRequest::Hardware(p), Direction::Decrypt) => self.hardware.decrypt(p, src, dst),
            (EngineRequest::Software(p), Direction::Encrypt) => self.software.encrypt(p, src, dst),
            (EngineRequest::Software(p), Direction::Decrypt) => self.software.decrypt(p, src, dst),
        };
        check_status(status)
    }
}
