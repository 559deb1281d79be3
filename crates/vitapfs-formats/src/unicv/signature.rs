//! Signature-tree blocks
//!
//! One block fills one page: a 16-byte header, `entry_count` signatures of
//! 20 bytes each, then zero padding up to the page boundary.

use crate::unicv::constants::{SIG_BLOCK_HEADER_SIZE, SIGNATURE_SIZE};
use crate::unicv::error::{Result, Structure, UnicvError};
use crate::unicv::io::{read_bytes, read_record, read_zero_padding};
use crate::unicv::layout::signature_block_byte_size;
use binrw::{BinRead, BinWrite};
use std::fmt;
use std::io::{Cursor, Read};
use tracing::trace;

/// One sector signature (HMAC-SHA1 sized digest)
#[derive(Clone, Copy, PartialEq, Eq, Hash, BinRead, BinWrite)]
pub struct Signature(pub [u8; SIGNATURE_SIZE as usize]);

impl Signature {
    /// Signature bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex representation
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; SIGNATURE_SIZE as usize]> for Signature {
    fn from(bytes: [u8; SIGNATURE_SIZE as usize]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// Signature block header (16 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct SignatureBlockHeader {
    /// Byte size of a full-capacity block (header + capacity * signature size)
    pub block_size: u32,

    /// Size of each signature entry (0x14)
    pub signature_size: u32,

    /// Number of signatures stored in this block
    pub entry_count: u32,

    /// Reserved, always 0
    pub reserved: u32,
}

impl SignatureBlockHeader {
    const BLOCK_SIZE_OFFSET: u64 = 0x00;
    const SIGNATURE_SIZE_OFFSET: u64 = 0x04;
    const ENTRY_COUNT_OFFSET: u64 = 0x08;
    const RESERVED_OFFSET: u64 = 0x0C;

    /// Create a header for a block in a table with the given page capacity
    pub fn new(capacity: u32, entry_count: u32) -> Self {
        Self {
            block_size: signature_block_byte_size(SIGNATURE_SIZE, capacity) as u32,
            signature_size: SIGNATURE_SIZE,
            entry_count,
            reserved: 0,
        }
    }

    /// Validate the header of a block that starts at `offset`
    ///
    /// The declared block size is always checked against the full page
    /// capacity, also for a partially filled last block.
    pub fn validate(&self, offset: u64, capacity: u32, expected_entries: u32) -> Result<()> {
        let expected_size = signature_block_byte_size(SIGNATURE_SIZE, capacity);
        if u64::from(self.block_size) != expected_size {
            return Err(UnicvError::UnexpectedSize {
                structure: Structure::SignatureBlock,
                field: "block_size",
                offset: offset + Self::BLOCK_SIZE_OFFSET,
                expected: expected_size,
                actual: u64::from(self.block_size),
            });
        }

        if self.signature_size != SIGNATURE_SIZE {
            return Err(UnicvError::UnexpectedSize {
                structure: Structure::SignatureBlock,
                field: "signature_size",
                offset: offset + Self::SIGNATURE_SIZE_OFFSET,
                expected: u64::from(SIGNATURE_SIZE),
                actual: u64::from(self.signature_size),
            });
        }

        if self.reserved != 0 {
            return Err(UnicvError::non_zero_field(
                Structure::SignatureBlock,
                "reserved",
                offset + Self::RESERVED_OFFSET,
                self.reserved,
            ));
        }

        if self.entry_count != expected_entries {
            return Err(UnicvError::CountMismatch {
                structure: Structure::SignatureBlock,
                field: "entry_count",
                offset: offset + Self::ENTRY_COUNT_OFFSET,
                expected: u64::from(expected_entries),
                actual: u64::from(self.entry_count),
            });
        }

        Ok(())
    }
}

/// Signature-tree block: header plus signatures in sector order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureBlock {
    /// Block header
    pub header: SignatureBlockHeader,
    /// Signatures, one per sector
    pub signatures: Vec<Signature>,
}

impl SignatureBlock {
    /// Read one block starting at `offset`
    ///
    /// Consumes exactly `page_size` bytes on success.
    pub(crate) fn read<R: Read>(
        reader: &mut R,
        offset: u64,
        page_size: u32,
        capacity: u32,
        expected_entries: u32,
    ) -> Result<Self> {
        let header: SignatureBlockHeader = read_record(reader, offset, SIG_BLOCK_HEADER_SIZE)?;
        header.validate(offset, capacity, expected_entries)?;

        let entries_offset = offset + u64::from(SIG_BLOCK_HEADER_SIZE);
        let entries_len = header.entry_count as usize * SIGNATURE_SIZE as usize;
        let mut raw = Cursor::new(read_bytes(reader, entries_offset, entries_len)?);
        let signatures = (0..header.entry_count)
            .map(|_| Signature::read_le(&mut raw))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let consumed = u64::from(SIG_BLOCK_HEADER_SIZE) + entries_len as u64;
        let tail = u64::from(page_size).checked_sub(consumed).ok_or(
            UnicvError::UnexpectedSize {
                structure: Structure::SignatureBlock,
                field: "entry_count",
                offset: offset + SignatureBlockHeader::ENTRY_COUNT_OFFSET,
                expected: u64::from(capacity),
                actual: u64::from(header.entry_count),
            },
        )?;
        read_zero_padding(
            reader,
            Structure::SignatureBlock,
            "tail padding",
            offset + consumed,
            tail,
        )?;

        trace!(
            offset,
            entries = signatures.len(),
            tail,
            "read signature block"
        );

        Ok(Self { header, signatures })
    }

    /// Serialize as one page
    pub(crate) fn write_page(&self, page_size: u32, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        let mut cursor = Cursor::new(Vec::with_capacity(page_size as usize));
        self.header.write(&mut cursor)?;
        for signature in &self.signatures {
            signature.write_le(&mut cursor)?;
        }
        let written = cursor.get_ref().len() as u64;
        if written > u64::from(page_size) {
            return Err(UnicvError::UnexpectedSize {
                structure: Structure::SignatureBlock,
                field: "block length",
                offset: start as u64,
                expected: u64::from(page_size),
                actual: written,
            });
        }
        out.extend_from_slice(cursor.get_ref());
        out.resize(start + page_size as usize, 0);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::unicv::layout::max_entries_per_page;

    const PAGE: u32 = 0x400;

    fn capacity() -> u32 {
        max_entries_per_page(SIGNATURE_SIZE, PAGE)
    }

    fn block_page(entries: u32) -> Vec<u8> {
        let block = SignatureBlock {
            header: SignatureBlockHeader::new(capacity(), entries),
            signatures: (0..entries).map(|i| Signature([i as u8 + 1; 20])).collect(),
        };
        let mut out = Vec::new();
        block.write_page(PAGE, &mut out).unwrap();
        out
    }

    #[test]
    fn test_header_layout() {
        let header = SignatureBlockHeader::new(capacity(), 3);
        let mut cursor = Cursor::new(Vec::new());
        header.write(&mut cursor).unwrap();
        assert_eq!(
            cursor.into_inner(),
            [
                0xF8, 0x03, 0, 0, // block size 0x3F8
                0x14, 0, 0, 0, // signature size
                3, 0, 0, 0, // entry count
                0, 0, 0, 0, // reserved
            ]
        );
    }

    #[test]
    fn test_partial_block_reads_one_page() {
        let page = block_page(7);
        assert_eq!(page.len(), PAGE as usize);

        let mut cursor = Cursor::new(page);
        let block = SignatureBlock::read(&mut cursor, 0, PAGE, capacity(), 7).unwrap();
        assert_eq!(cursor.position(), u64::from(PAGE));
        assert_eq!(block.signatures.len(), 7);
        assert_eq!(block.signatures[0], Signature([1; 20]));
        assert_eq!(block.signatures[6], Signature([7; 20]));
        assert_eq!(block.header.block_size, 0x3F8);
    }

    #[test]
    fn test_entry_count_mismatch() {
        let err = SignatureBlock::read(&mut Cursor::new(block_page(7)), 0x800, PAGE, capacity(), 8)
            .unwrap_err();
        assert!(matches!(
            err,
            UnicvError::CountMismatch {
                field: "entry_count",
                offset: 0x808,
                expected: 8,
                actual: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_block_size_checked_against_capacity() {
        let mut page = block_page(1);
        page[0..4].copy_from_slice(&36u32.to_le_bytes());
        let err =
            SignatureBlock::read(&mut Cursor::new(page), 0, PAGE, capacity(), 1).unwrap_err();
        assert!(matches!(
            err,
            UnicvError::UnexpectedSize {
                field: "block_size",
                expected: 0x3F8,
                actual: 36,
                ..
            }
        ));
    }

    #[test]
    fn test_signature_size_checked() {
        let mut page = block_page(1);
        page[4] = 0x10;
        let err =
            SignatureBlock::read(&mut Cursor::new(page), 0, PAGE, capacity(), 1).unwrap_err();
        assert!(matches!(
            err,
            UnicvError::UnexpectedSize {
                field: "signature_size",
                offset: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_reserved_checked() {
        let mut page = block_page(1);
        page[0x0D] = 0x02;
        let err =
            SignatureBlock::read(&mut Cursor::new(page), 0, PAGE, capacity(), 1).unwrap_err();
        assert!(matches!(
            err,
            UnicvError::NonZeroPadding {
                field: "reserved",
                offset: 0x0D,
                value: 0x02,
                ..
            }
        ));
    }

    #[test]
    fn test_tail_padding_checked() {
        let mut page = block_page(2);
        page[0x3FF] = 1;
        let err =
            SignatureBlock::read(&mut Cursor::new(page), 0x400, PAGE, capacity(), 2).unwrap_err();
        assert!(matches!(
            err,
            UnicvError::NonZeroPadding {
                field: "tail padding",
                offset: 0x7FF,
                value: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_block_is_io_error() {
        let mut page = block_page(2);
        page.truncate(0x100);
        let err =
            SignatureBlock::read(&mut Cursor::new(page), 0, PAGE, capacity(), 2).unwrap_err();
        assert!(matches!(err, UnicvError::Io { .. }));
    }

    #[test]
    fn test_signature_display() {
        let sig = Signature([0xAB; 20]);
        assert_eq!(sig.to_string(), "ab".repeat(20));
        assert_eq!(sig.as_bytes().len(), 20);
    }
}
