//! `unicv.db` signature database
//!
//! The database protects every sector of every file in a PFS container with
//! a 20-byte signature. It is a flat run of fixed-size pages:
//!
//! - Page 0: database header (`SCEIRODB`), rest of the page unused
//! - Then, per protected file, one file table: a header page (`SCEIFTBL`)
//!   followed by `ceil(sector_count / max_entries_per_page)` signature block
//!   pages
//!
//! Nothing records how many file tables there are. The reader consumes
//! tables until `data_size / page_size` pages have been read, and rejects the
//! database if the stream does not end exactly there.
//!
//! # Usage
//!
//! ```rust,no_run
//! use vitapfs_formats::unicv::{Signature, UnicvDb, UnicvDbBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Build a database with one file of 60 sectors
//! let data = UnicvDbBuilder::new()
//!     .add_file(vec![Signature([0xAA; 20]); 60])
//!     .build_bytes()?;
//!
//! // Parse it back
//! let db = UnicvDb::parse(&data)?;
//! assert_eq!(db.tables[0].blocks.len(), 2);
//!
//! // Or open a title directory
//! let db = UnicvDb::open_title("ux0:app/PCSE00000")?;
//! println!("{} signatures", db.signature_count());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod file_table;
pub mod header;
mod io;
pub mod layout;
pub mod reader;
pub mod signature;

// Re-export main types
pub use builder::UnicvDbBuilder;
pub use config::UnicvConfig;
pub use database::UnicvDb;
pub use error::{Result, Structure, UnicvError};
pub use file_table::{FileTable, FileTableHeader};
pub use header::DbHeader;
pub use layout::{max_entries_per_page, signature_block_byte_size};
pub use reader::UnicvReader;
pub use signature::{Signature, SignatureBlock, SignatureBlockHeader};
