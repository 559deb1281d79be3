//! Complete `unicv.db` structure

use crate::PfsFormat;
use crate::unicv::config::UnicvConfig;
use crate::unicv::constants::UNICV_RELATIVE_PATH;
use crate::unicv::error::{Result, UnicvError};
use crate::unicv::file_table::FileTable;
use crate::unicv::header::DbHeader;
use crate::unicv::reader::UnicvReader;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Parsed `unicv.db`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicvDb {
    /// Database header
    pub header: DbHeader,
    /// File tables in file order
    pub tables: Vec<FileTable>,
}

impl UnicvDb {
    /// Parse a database held in memory
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with_config(data, &UnicvConfig::default())
    }

    /// Parse a database held in memory with a custom configuration
    pub fn parse_with_config(data: &[u8], config: &UnicvConfig) -> Result<Self> {
        Self::from_reader_with_config(Cursor::new(data), config)
    }

    /// Parse a database from a seekable stream
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_reader_with_config(reader, &UnicvConfig::default())
    }

    /// Parse a database from a seekable stream with a custom configuration
    ///
    /// Either every check passes and the whole database is returned, or the
    /// first failing check is reported.
    pub fn from_reader_with_config<R: Read + Seek>(reader: R, config: &UnicvConfig) -> Result<Self> {
        let mut reader = UnicvReader::with_config(reader, *config)?;
        let tables = reader.by_ref().collect::<Result<Vec<_>>>()?;
        let (header, _) = reader.finish()?;

        debug!(tables = tables.len(), "parsed unicv.db");
        Ok(Self { header, tables })
    }

    /// Open and parse a `unicv.db` file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, &UnicvConfig::default())
    }

    /// Open and parse a `unicv.db` file with a custom configuration
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: &UnicvConfig) -> Result<Self> {
        let path = path.as_ref();
        debug!("parsing {}", path.display());
        let file = File::open(path).map_err(|e| UnicvError::io(0, e))?;
        Self::from_reader_with_config(BufReader::new(file), config)
    }

    /// Open `sce_pfs/unicv.db` inside a title directory
    pub fn open_title<P: AsRef<Path>>(title_dir: P) -> Result<Self> {
        let path = UNICV_RELATIVE_PATH
            .iter()
            .fold(title_dir.as_ref().to_path_buf(), |p, part| p.join(part));
        Self::open(path)
    }

    /// Data pages covered by the file tables
    pub fn total_pages(&self) -> u64 {
        self.tables.iter().map(FileTable::page_count).sum()
    }

    /// Bytes accounted for by the parse (header page + all table pages)
    pub fn consumed_bytes(&self) -> u64 {
        (1 + self.total_pages()) * u64::from(self.header.page_size)
    }

    /// Total number of signatures across all tables
    pub fn signature_count(&self) -> usize {
        self.tables.iter().map(FileTable::signature_count).sum()
    }

    /// Serialize the database
    ///
    /// The unused part of the header page is written as zeros.
    pub fn build(&self) -> Result<Vec<u8>> {
        let page_size = self.header.page_size as usize;
        let mut out = Vec::with_capacity(self.consumed_bytes() as usize);

        let mut cursor = Cursor::new(Vec::new());
        binrw::BinWrite::write(&self.header, &mut cursor)?;
        out.extend_from_slice(cursor.get_ref());
        out.resize(page_size, 0);

        for table in &self.tables {
            table.write_pages(&mut out)?;
        }
        Ok(out)
    }
}

impl PfsFormat for UnicvDb {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Ok(UnicvDb::parse(data)?)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(UnicvDb::build(self)?)
    }
}
