//! Error types for `unicv.db` parsing and building

use std::fmt;
use thiserror::Error;

/// On-disk structure in which a check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    /// `SCEIRODB` database header
    DatabaseHeader,
    /// `SCEIFTBL` file table header page
    FileTableHeader,
    /// Signature-tree block page
    SignatureBlock,
    /// The stream as a whole
    Stream,
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DatabaseHeader => "database header",
            Self::FileTableHeader => "file table header",
            Self::SignatureBlock => "signature block",
            Self::Stream => "stream",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when parsing or building `unicv.db` files
///
/// All structural variants carry the structure, field and absolute byte
/// offset at which the check failed.
#[derive(Debug, Error)]
pub enum UnicvError {
    /// Magic word does not match
    #[error("{structure}: invalid magic at offset 0x{offset:X}: expected {expected:?}, got {actual:?}")]
    MagicMismatch {
        /// Structure being read
        structure: Structure,
        /// Absolute offset of the magic field
        offset: u64,
        /// Expected magic
        expected: [u8; 8],
        /// Magic found in the stream
        actual: [u8; 8],
    },

    /// Version is not one of the accepted values
    #[error("{structure}: unsupported version {version} at offset 0x{offset:X}")]
    UnsupportedVersion {
        /// Structure being read
        structure: Structure,
        /// Absolute offset of the version field
        offset: u64,
        /// Version found in the stream
        version: u32,
    },

    /// A page, sector, signature or block size field has the wrong value
    #[error(
        "{structure}: unexpected {field} at offset 0x{offset:X}: expected 0x{expected:X}, got 0x{actual:X}"
    )]
    UnexpectedSize {
        /// Structure being read
        structure: Structure,
        /// Field name
        field: &'static str,
        /// Absolute offset of the field
        offset: u64,
        /// Expected value
        expected: u64,
        /// Value found in the stream
        actual: u64,
    },

    /// A padding region or zero-reserved field holds non-zero data
    #[error("{structure}: non-zero {field} at offset 0x{offset:X} (byte 0x{value:02X})")]
    NonZeroPadding {
        /// Structure being read
        structure: Structure,
        /// Padding region or field name
        field: &'static str,
        /// Absolute offset of the first non-zero byte
        offset: u64,
        /// First non-zero byte found
        value: u8,
    },

    /// A reserved word does not hold its fixed value
    #[error(
        "{structure}: unexpected {field} at offset 0x{offset:X}: expected 0x{expected:08X}, got 0x{actual:08X}"
    )]
    ReservedMismatch {
        /// Structure being read
        structure: Structure,
        /// Field name
        field: &'static str,
        /// Absolute offset of the field
        offset: u64,
        /// Expected value
        expected: u32,
        /// Value found in the stream
        actual: u32,
    },

    /// Entry or sector accounting does not match
    #[error(
        "{structure}: {field} mismatch at offset 0x{offset:X}: expected {expected}, got {actual}"
    )]
    CountMismatch {
        /// Structure being read
        structure: Structure,
        /// Field name
        field: &'static str,
        /// Absolute offset of the field
        offset: u64,
        /// Expected count
        expected: u64,
        /// Count found in the stream
        actual: u64,
    },

    /// Global size or final position does not line up
    #[error("stream alignment: {reason} at offset 0x{offset:X}: expected 0x{expected:X}, got 0x{actual:X}")]
    StreamAlignment {
        /// What was being checked
        reason: &'static str,
        /// Offset at which the check was made
        offset: u64,
        /// Expected value
        expected: u64,
        /// Actual value
        actual: u64,
    },

    /// Underlying read failed (including a short read)
    #[error("I/O error at offset 0x{offset:X}: {source}")]
    Io {
        /// Offset at which the read was attempted
        offset: u64,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Binary record encoding or decoding failed
    #[error("Binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),

    /// Parser configuration is unusable
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl UnicvError {
    /// Absolute byte offset associated with the error, if any
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::MagicMismatch { offset, .. }
            | Self::UnsupportedVersion { offset, .. }
            | Self::UnexpectedSize { offset, .. }
            | Self::NonZeroPadding { offset, .. }
            | Self::ReservedMismatch { offset, .. }
            | Self::CountMismatch { offset, .. }
            | Self::StreamAlignment { offset, .. }
            | Self::Io { offset, .. } => Some(*offset),
            Self::BinRw(_) | Self::Config(_) => None,
        }
    }

    /// Structure associated with the error, if any
    pub fn structure(&self) -> Option<Structure> {
        match self {
            Self::MagicMismatch { structure, .. }
            | Self::UnsupportedVersion { structure, .. }
            | Self::UnexpectedSize { structure, .. }
            | Self::NonZeroPadding { structure, .. }
            | Self::ReservedMismatch { structure, .. }
            | Self::CountMismatch { structure, .. } => Some(*structure),
            Self::StreamAlignment { .. } => Some(Structure::Stream),
            Self::Io { .. } | Self::BinRw(_) | Self::Config(_) => None,
        }
    }

    pub(crate) fn io(offset: u64, source: std::io::Error) -> Self {
        Self::Io { offset, source }
    }

    /// Non-zero reserved word, reported at its first non-zero byte
    pub(crate) fn non_zero_field(
        structure: Structure,
        field: &'static str,
        offset: u64,
        value: u32,
    ) -> Self {
        let bytes = value.to_le_bytes();
        let index = bytes.iter().position(|&b| b != 0).unwrap_or(0);
        Self::NonZeroPadding {
            structure,
            field,
            offset: offset + index as u64,
            value: bytes[index],
        }
    }
}

/// Result type for `unicv.db` operations
pub type Result<T> = std::result::Result<T, UnicvError>;

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_structure_field_and_offset() {
        let err = UnicvError::UnexpectedSize {
            structure: Structure::FileTableHeader,
            field: "page_size",
            offset: 0x40C,
            expected: 0x400,
            actual: 0x800,
        };
        let msg = err.to_string();
        assert!(msg.contains("file table header"));
        assert!(msg.contains("page_size"));
        assert!(msg.contains("0x40C"));
        assert_eq!(err.offset(), Some(0x40C));
        assert_eq!(err.structure(), Some(Structure::FileTableHeader));
    }

    #[test]
    fn test_io_error_keeps_offset() {
        let err = UnicvError::io(
            0x800,
            std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
        );
        assert_eq!(err.offset(), Some(0x800));
        assert!(err.structure().is_none());
    }
}
