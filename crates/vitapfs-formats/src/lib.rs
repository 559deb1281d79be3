//! File format parsers and builders for the PFS container filesystem
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Many PFS-specific terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::use_self)] // Type clarity
//! This crate provides symmetric (parser and builder) implementations for the
//! page-based integrity databases that a PFS title ships next to its
//! encrypted files.
//!
//! # Supported Formats
//!
//! - **unicv.db**: Per-title signature database (`SCEIRODB` header followed
//!   by `SCEIFTBL` file tables and their signature-tree blocks)
//!
//! # Design Principles
//!
//! Every format implementation follows these principles:
//! - **Strict Validation**: Every magic word, version, size field and padding
//!   byte is checked; there is no best-effort mode
//! - **Forward-Only Reads**: Structures are read in file order, one page at a time
//! - **Type Safety**: Use Rust's type system to enforce invariants
//! - **Round-Trip Guarantee**: parse(build(data)) == data

#![warn(missing_docs)]

/// `unicv.db` signature database
///
/// This module provides complete parsing and building support for the
/// `sce_pfs/unicv.db` file. The database is a flat sequence of fixed-size
/// pages with no directory: the grouping of pages into per-file signature
/// tables is inferred from sector counts and the page capacity.
///
/// Key features:
/// - **Page Accounting**: File tables are read until the page budget from the
///   database header is exhausted
/// - **Padding Validation**: Every unused byte is read and checked for zero
/// - **Streaming Support**: [`unicv::UnicvReader`] yields one file table at a time
/// - **Builder**: [`unicv::UnicvDbBuilder`] produces well-formed databases
///
/// See the [`unicv`] module for detailed usage examples.
pub mod unicv;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

/// Common format trait that all formats should implement
pub trait PfsFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
