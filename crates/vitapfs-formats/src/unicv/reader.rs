//! Streaming `unicv.db` reader
//!
//! The database stores no table count. [`UnicvReader`] yields file tables
//! until the page budget from the header (`data_size / page_size`) is used
//! up, then [`UnicvReader::finish`] checks that the budget and the stream
//! ended together.

use crate::unicv::config::UnicvConfig;
use crate::unicv::constants::DB_HEADER_SIZE;
use crate::unicv::error::{Result, UnicvError};
use crate::unicv::file_table::FileTable;
use crate::unicv::header::DbHeader;
use crate::unicv::io::{position, read_record};
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// Forward-only reader over the file tables of one database
pub struct UnicvReader<R> {
    reader: R,
    config: UnicvConfig,
    header: DbHeader,
    stream_len: u64,
    total_pages: u64,
    pages_read: u64,
    failed: bool,
}

impl<R: Read + Seek> UnicvReader<R> {
    /// Read and validate the database header using the default configuration
    pub fn new(reader: R) -> Result<Self> {
        Self::with_config(reader, UnicvConfig::default())
    }

    /// Read and validate the database header
    ///
    /// On success the stream is positioned at the first file table page.
    pub fn with_config(mut reader: R, config: UnicvConfig) -> Result<Self> {
        config.validate()?;

        let stream_len = reader
            .seek(SeekFrom::End(0))
            .map_err(|e| UnicvError::io(0, e))?;
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| UnicvError::io(0, e))?;

        let header: DbHeader = read_record(&mut reader, 0, DB_HEADER_SIZE)?;
        header.validate(stream_len, &config)?;

        let page_size = u64::from(header.page_size);
        let total_pages = header
            .data_pages()
            .ok_or(UnicvError::StreamAlignment {
                reason: "data region is not a whole number of pages",
                offset: page_size,
                expected: 0,
                actual: header.data_size % page_size,
            })?;

        // The rest of the header page is not interpreted
        reader
            .seek(SeekFrom::Start(page_size))
            .map_err(|e| UnicvError::io(page_size, e))?;

        debug!(
            version = header.version,
            page_size = header.page_size,
            data_size = header.data_size,
            total_pages,
            "read unicv.db header"
        );

        Ok(Self {
            reader,
            config,
            header,
            stream_len,
            total_pages,
            pages_read: 0,
            failed: false,
        })
    }

    /// Database header
    pub fn header(&self) -> &DbHeader {
        &self.header
    }

    /// Total length of the underlying stream
    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    /// Data pages in the database
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Data pages consumed so far
    pub fn pages_read(&self) -> u64 {
        self.pages_read
    }

    /// Data pages not yet consumed
    pub fn pages_remaining(&self) -> u64 {
        self.total_pages.saturating_sub(self.pages_read)
    }

    /// Offset of the next unread data page
    fn page_offset(&self) -> u64 {
        u64::from(self.header.page_size) * (1 + self.pages_read)
    }

    fn read_table(&mut self) -> Result<FileTable> {
        let expected = self.page_offset();
        let offset = position(&mut self.reader, expected)?;
        if offset != expected {
            return Err(UnicvError::StreamAlignment {
                reason: "file table does not start on its page boundary",
                offset,
                expected,
                actual: offset,
            });
        }

        let table = FileTable::read(&mut self.reader, offset, &self.config)?;
        self.pages_read += table.page_count();
        Ok(table)
    }

    /// Verify that the page budget and the stream were consumed exactly
    ///
    /// Returns the database header and the underlying reader.
    pub fn finish(mut self) -> Result<(DbHeader, R)> {
        let expected = self.page_offset();
        let end = position(&mut self.reader, expected)?;

        if self.pages_read != self.total_pages {
            return Err(UnicvError::StreamAlignment {
                reason: "file tables do not fill the data region",
                offset: end,
                expected: self.total_pages,
                actual: self.pages_read,
            });
        }

        if end != self.stream_len {
            return Err(UnicvError::StreamAlignment {
                reason: "final position does not match the stream length",
                offset: end,
                expected: self.stream_len,
                actual: end,
            });
        }

        Ok((self.header, self.reader))
    }
}

impl<R: Read + Seek> Iterator for UnicvReader<R> {
    type Item = Result<FileTable>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pages_read >= self.total_pages {
            return None;
        }

        let result = self.read_table();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
