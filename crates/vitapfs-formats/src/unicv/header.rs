//! Database header (`SCEIRODB`)

use crate::unicv::config::UnicvConfig;
use crate::unicv::constants::{DB_MAGIC, DB_RESERVED_VALUE, VERSION_2, is_supported_version};
use crate::unicv::error::{Result, Structure, UnicvError};
use binrw::{BinRead, BinWrite};

/// Database header (32 bytes, first page of the file)
///
/// The rest of the header page is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct DbHeader {
    /// Magic bytes: `SCEIRODB`
    pub magic: [u8; 8],

    /// Format version (1 or 2)
    pub version: u32,

    /// Page size of every page in the file
    pub page_size: u32,

    /// Reserved, always `0xFFFFFFFF`
    pub reserved0: u32,

    /// Reserved, always `0xFFFFFFFF`
    pub reserved1: u32,

    /// Byte length of the data region that follows the header page
    pub data_size: u64,
}

impl DbHeader {
    const VERSION_OFFSET: u64 = 0x08;
    const PAGE_SIZE_OFFSET: u64 = 0x0C;
    const RESERVED0_OFFSET: u64 = 0x10;
    const RESERVED1_OFFSET: u64 = 0x14;
    const DATA_SIZE_OFFSET: u64 = 0x18;

    /// Create a version 2 header for `data_size` bytes of file tables
    pub fn new(page_size: u32, data_size: u64) -> Self {
        Self {
            magic: DB_MAGIC,
            version: VERSION_2,
            page_size,
            reserved0: DB_RESERVED_VALUE,
            reserved1: DB_RESERVED_VALUE,
            data_size,
        }
    }

    /// Total file length implied by the header (header page + data region)
    ///
    /// `None` if the sum does not fit in a `u64`.
    pub fn file_size(&self) -> Option<u64> {
        self.data_size.checked_add(u64::from(self.page_size))
    }

    /// Number of pages in the data region, if it is page aligned
    pub fn data_pages(&self) -> Option<u64> {
        let page_size = u64::from(self.page_size);
        if page_size == 0 || self.data_size % page_size != 0 {
            return None;
        }
        Some(self.data_size / page_size)
    }

    /// Validate the header against the stream length and configuration
    pub fn validate(&self, stream_len: u64, config: &UnicvConfig) -> Result<()> {
        let Some(file_size) = self.file_size() else {
            return Err(UnicvError::StreamAlignment {
                reason: "data_size + page_size overflows",
                offset: Self::DATA_SIZE_OFFSET,
                expected: stream_len.saturating_sub(u64::from(self.page_size)),
                actual: self.data_size,
            });
        };

        if file_size != stream_len {
            return Err(UnicvError::StreamAlignment {
                reason: "data_size + page_size must equal the stream length",
                offset: Self::DATA_SIZE_OFFSET,
                expected: stream_len,
                actual: file_size,
            });
        }

        if self.magic != DB_MAGIC {
            return Err(UnicvError::MagicMismatch {
                structure: Structure::DatabaseHeader,
                offset: 0,
                expected: DB_MAGIC,
                actual: self.magic,
            });
        }

        if !is_supported_version(self.version) {
            return Err(UnicvError::UnsupportedVersion {
                structure: Structure::DatabaseHeader,
                offset: Self::VERSION_OFFSET,
                version: self.version,
            });
        }

        for (field, offset, value) in [
            ("reserved0", Self::RESERVED0_OFFSET, self.reserved0),
            ("reserved1", Self::RESERVED1_OFFSET, self.reserved1),
        ] {
            if value != DB_RESERVED_VALUE {
                return Err(UnicvError::ReservedMismatch {
                    structure: Structure::DatabaseHeader,
                    field,
                    offset,
                    expected: DB_RESERVED_VALUE,
                    actual: value,
                });
            }
        }

        if self.page_size != config.page_size {
            return Err(UnicvError::UnexpectedSize {
                structure: Structure::DatabaseHeader,
                field: "page_size",
                offset: Self::PAGE_SIZE_OFFSET,
                expected: u64::from(config.page_size),
                actual: u64::from(self.page_size),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    fn valid_header() -> DbHeader {
        DbHeader::new(0x400, 0x800)
    }

    #[test]
    fn test_header_parsing() {
        let mut data = Vec::new();
        data.extend_from_slice(b"SCEIRODB");
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&0x400u32.to_le_bytes());
        data.extend_from_slice(&[0xFF; 8]);
        data.extend_from_slice(&0x1400u64.to_le_bytes());

        let header = DbHeader::read(&mut Cursor::new(&data)).unwrap();
        assert_eq!(header.magic, DB_MAGIC);
        assert_eq!(header.version, 1);
        assert_eq!(header.page_size, 0x400);
        assert_eq!(header.reserved0, 0xFFFF_FFFF);
        assert_eq!(header.reserved1, 0xFFFF_FFFF);
        assert_eq!(header.data_size, 0x1400);
        assert_eq!(header.data_pages(), Some(5));
        assert_eq!(header.file_size(), Some(0x1800));
    }

    #[test]
    fn test_valid_header_passes_validation() {
        assert!(
            valid_header()
                .validate(0xC00, &UnicvConfig::default())
                .is_ok()
        );
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = valid_header()
            .validate(0x1000, &UnicvConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            UnicvError::StreamAlignment {
                expected: 0x1000,
                actual: 0xC00,
                ..
            }
        ));
    }

    #[test]
    fn test_data_size_overflow_rejected() {
        let h = DbHeader::new(0x400, u64::MAX);
        assert_eq!(h.file_size(), None);
        assert!(matches!(
            h.validate(0xC00, &UnicvConfig::default()),
            Err(UnicvError::StreamAlignment {
                offset: 0x18,
                actual: u64::MAX,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let mut h = valid_header();
        h.magic[7] = b'X';
        assert!(matches!(
            h.validate(0xC00, &UnicvConfig::default()),
            Err(UnicvError::MagicMismatch { offset: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_version_rejected() {
        let mut h = valid_header();
        h.version = 3;
        assert!(matches!(
            h.validate(0xC00, &UnicvConfig::default()),
            Err(UnicvError::UnsupportedVersion {
                version: 3,
                offset: 8,
                ..
            })
        ));
    }

    #[test]
    fn test_reserved_words_checked() {
        let mut h = valid_header();
        h.reserved1 = 0;
        assert!(matches!(
            h.validate(0xC00, &UnicvConfig::default()),
            Err(UnicvError::ReservedMismatch {
                field: "reserved1",
                offset: 0x14,
                ..
            })
        ));
    }

    #[test]
    fn test_unexpected_page_size_rejected() {
        let h = DbHeader::new(0x800, 0x800);
        assert!(matches!(
            h.validate(0x1000, &UnicvConfig::default()),
            Err(UnicvError::UnexpectedSize {
                field: "page_size",
                expected: 0x400,
                actual: 0x800,
                ..
            })
        ));
    }

    #[test]
    fn test_misaligned_data_region() {
        assert_eq!(DbHeader::new(0x400, 0x500).data_pages(), None);
        assert_eq!(DbHeader::new(0, 0x500).data_pages(), None);
    }
}
