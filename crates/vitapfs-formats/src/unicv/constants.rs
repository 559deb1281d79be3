//! Format constants for `unicv.db`
//!
//! Every validator compares against the values in this module. They are part
//! of the on-disk contract; a mismatch is always a hard parse failure.

/// Database header magic
pub const DB_MAGIC: [u8; 8] = *b"SCEIRODB";

/// File table header magic
pub const FTBL_MAGIC: [u8; 8] = *b"SCEIFTBL";

/// First accepted format version
pub const VERSION_1: u32 = 1;

/// Second accepted format version
pub const VERSION_2: u32 = 2;

/// All accepted format versions
pub const SUPPORTED_VERSIONS: [u32; 2] = [VERSION_1, VERSION_2];

/// Page size of every database in the wild
pub const EXPECTED_PAGE_SIZE: u32 = 0x400;

/// Size of the file data sector covered by one signature
pub const EXPECTED_FILE_SECTOR_SIZE: u32 = 0x8000;

/// Size of one signature entry (HMAC-SHA1 digest)
pub const SIGNATURE_SIZE: u32 = 0x14;

/// Value of both reserved words in the database header
pub const DB_RESERVED_VALUE: u32 = 0xFFFF_FFFF;

/// Size of the encoded database header
pub const DB_HEADER_SIZE: u32 = 0x20;

/// Size of the encoded file table header
pub const FTBL_HEADER_SIZE: u32 = 0x20;

/// Size of the encoded signature block header
pub const SIG_BLOCK_HEADER_SIZE: u32 = 0x10;

/// Relative path of the database inside a title directory
pub const UNICV_RELATIVE_PATH: [&str; 2] = ["sce_pfs", "unicv.db"];

/// Check whether a version number is accepted
pub fn is_supported_version(version: u32) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}
