//! File tables (`SCEIFTBL`)
//!
//! A file table is one header page followed by the signature blocks that
//! cover its sectors. The number of blocks is not stored; it follows from the
//! sector count and the page capacity.

use crate::unicv::config::UnicvConfig;
use crate::unicv::constants::{
    FTBL_HEADER_SIZE, FTBL_MAGIC, SIGNATURE_SIZE, VERSION_2, is_supported_version,
};
use crate::unicv::error::{Result, Structure, UnicvError};
use crate::unicv::io::{read_record, read_zero_padding};
use crate::unicv::layout::{block_entry_counts, max_entries_per_page, signature_block_count};
use crate::unicv::signature::{Signature, SignatureBlock};
use binrw::{BinRead, BinWrite};
use std::io::Read;
use tracing::debug;

/// File table header (32 bytes, zero padded to one page)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct FileTableHeader {
    /// Magic bytes: `SCEIFTBL`
    pub magic: [u8; 8],

    /// Format version (1 or 2)
    pub version: u32,

    /// Page size
    pub page_size: u32,

    /// Signatures per signature block page
    pub max_entries_per_page: u32,

    /// Number of protected sectors in the file
    pub sector_count: u32,

    /// Size of one protected sector (0x8000)
    pub file_sector_size: u32,

    /// Reserved, always 0
    pub reserved: u32,
}

impl FileTableHeader {
    const VERSION_OFFSET: u64 = 0x08;
    const PAGE_SIZE_OFFSET: u64 = 0x0C;
    const MAX_ENTRIES_OFFSET: u64 = 0x10;
    const FILE_SECTOR_SIZE_OFFSET: u64 = 0x18;
    const RESERVED_OFFSET: u64 = 0x1C;

    /// Create a version 2 header for a file with `sector_count` sectors
    pub fn new(config: &UnicvConfig, sector_count: u32) -> Self {
        Self {
            magic: FTBL_MAGIC,
            version: VERSION_2,
            page_size: config.page_size,
            max_entries_per_page: config.max_entries_per_page(),
            sector_count,
            file_sector_size: config.file_sector_size,
            reserved: 0,
        }
    }

    /// Number of signature blocks that follow this header
    pub fn block_count(&self) -> u32 {
        signature_block_count(self.sector_count, self.max_entries_per_page)
    }

    /// Validate a header whose page starts at `offset`
    pub fn validate(&self, offset: u64, config: &UnicvConfig) -> Result<()> {
        if self.page_size != config.page_size {
            return Err(UnicvError::UnexpectedSize {
                structure: Structure::FileTableHeader,
                field: "page_size",
                offset: offset + Self::PAGE_SIZE_OFFSET,
                expected: u64::from(config.page_size),
                actual: u64::from(self.page_size),
            });
        }

        if self.magic != FTBL_MAGIC {
            return Err(UnicvError::MagicMismatch {
                structure: Structure::FileTableHeader,
                offset,
                expected: FTBL_MAGIC,
                actual: self.magic,
            });
        }

        if !is_supported_version(self.version) {
            return Err(UnicvError::UnsupportedVersion {
                structure: Structure::FileTableHeader,
                offset: offset + Self::VERSION_OFFSET,
                version: self.version,
            });
        }

        let capacity = max_entries_per_page(SIGNATURE_SIZE, self.page_size);
        if self.max_entries_per_page != capacity {
            return Err(UnicvError::UnexpectedSize {
                structure: Structure::FileTableHeader,
                field: "max_entries_per_page",
                offset: offset + Self::MAX_ENTRIES_OFFSET,
                expected: u64::from(capacity),
                actual: u64::from(self.max_entries_per_page),
            });
        }

        if self.file_sector_size != config.file_sector_size {
            return Err(UnicvError::UnexpectedSize {
                structure: Structure::FileTableHeader,
                field: "file_sector_size",
                offset: offset + Self::FILE_SECTOR_SIZE_OFFSET,
                expected: u64::from(config.file_sector_size),
                actual: u64::from(self.file_sector_size),
            });
        }

        if self.reserved != 0 {
            return Err(UnicvError::non_zero_field(
                Structure::FileTableHeader,
                "reserved",
                offset + Self::RESERVED_OFFSET,
                self.reserved,
            ));
        }

        Ok(())
    }
}

/// Signature table of one protected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTable {
    /// Index of the header page in the file
    pub page: u64,
    /// Table header
    pub header: FileTableHeader,
    /// Signature blocks in sector order
    pub blocks: Vec<SignatureBlock>,
}

impl FileTable {
    /// Read one file table whose header page starts at `offset`
    pub(crate) fn read<R: Read>(reader: &mut R, offset: u64, config: &UnicvConfig) -> Result<Self> {
        let header: FileTableHeader = read_record(reader, offset, FTBL_HEADER_SIZE)?;
        header.validate(offset, config)?;

        let page_size = u64::from(header.page_size);
        let page = offset / page_size;

        read_zero_padding(
            reader,
            Structure::FileTableHeader,
            "tail padding",
            offset + u64::from(FTBL_HEADER_SIZE),
            page_size - u64::from(FTBL_HEADER_SIZE),
        )?;

        debug!(
            page,
            sector_count = header.sector_count,
            blocks = header.block_count(),
            "read file table header"
        );

        let capacity = header.max_entries_per_page;
        // Grown per block read; sector_count is not trusted for sizing
        let mut blocks = Vec::new();
        let mut block_offset = offset + page_size;
        for expected in block_entry_counts(header.sector_count, capacity) {
            blocks.push(SignatureBlock::read(
                reader,
                block_offset,
                header.page_size,
                capacity,
                expected,
            )?);
            block_offset += page_size;
        }

        Ok(Self {
            page,
            header,
            blocks,
        })
    }

    /// Pages occupied by this table (header page + block pages)
    pub fn page_count(&self) -> u64 {
        1 + self.blocks.len() as u64
    }

    /// Total number of signatures
    pub fn signature_count(&self) -> usize {
        self.blocks.iter().map(|b| b.signatures.len()).sum()
    }

    /// Signatures in sector order
    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.blocks.iter().flat_map(|b| b.signatures.iter())
    }

    /// Signature of sector `index`
    pub fn signature(&self, index: usize) -> Option<&Signature> {
        let capacity = self.header.max_entries_per_page as usize;
        if capacity == 0 {
            return None;
        }
        self.blocks
            .get(index / capacity)
            .and_then(|b| b.signatures.get(index % capacity))
    }

    /// Serialize header page and block pages
    pub(crate) fn write_pages(&self, out: &mut Vec<u8>) -> Result<()> {
        let page_size = self.header.page_size;
        let start = out.len();
        let mut cursor = std::io::Cursor::new(Vec::with_capacity(FTBL_HEADER_SIZE as usize));
        self.header.write(&mut cursor)?;
        out.extend_from_slice(cursor.get_ref());
        out.resize(start + page_size as usize, 0);

        for block in &self.blocks {
            block.write_page(page_size, out)?;
        }
        Ok(())
    }
}
