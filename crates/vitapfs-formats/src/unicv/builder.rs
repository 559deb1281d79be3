//! Builder for constructing `unicv.db` databases

use crate::unicv::config::UnicvConfig;
use crate::unicv::constants::{VERSION_2, is_supported_version};
use crate::unicv::database::UnicvDb;
use crate::unicv::error::{Result, Structure, UnicvError};
use crate::unicv::file_table::{FileTable, FileTableHeader};
use crate::unicv::header::DbHeader;
use crate::unicv::signature::{Signature, SignatureBlock, SignatureBlockHeader};

/// Builder for constructing `UnicvDb` instances
///
/// Each added file becomes one file table. The builder splits its signatures
/// into full-capacity blocks and a remainder block, and computes the
/// database data size at build time.
pub struct UnicvDbBuilder {
    config: UnicvConfig,
    version: u32,
    files: Vec<Vec<Signature>>,
}

impl UnicvDbBuilder {
    /// Create a new builder with default settings
    ///
    /// Defaults: version 2, default page size and file sector size
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: UnicvConfig::default(),
            version: VERSION_2,
            files: Vec::new(),
        }
    }

    /// Use a custom page size / file sector size configuration
    #[must_use]
    pub fn config(mut self, config: UnicvConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the format version written to every header (1 or 2)
    #[must_use]
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Add a file protected by one signature per sector
    #[must_use]
    pub fn add_file(mut self, signatures: Vec<Signature>) -> Self {
        self.files.push(signatures);
        self
    }

    /// Add a file with no protected sectors (header page only)
    #[must_use]
    pub fn add_empty_file(self) -> Self {
        self.add_file(Vec::new())
    }

    /// Build the final `UnicvDb`
    pub fn build(self) -> Result<UnicvDb> {
        self.config.validate()?;

        if !is_supported_version(self.version) {
            return Err(UnicvError::UnsupportedVersion {
                structure: Structure::DatabaseHeader,
                offset: 0x08,
                version: self.version,
            });
        }

        let page_size = u64::from(self.config.page_size);
        let capacity = self.config.max_entries_per_page() as usize;
        let mut page = 1u64;
        let mut tables = Vec::with_capacity(self.files.len());

        for signatures in self.files {
            let sector_count =
                u32::try_from(signatures.len()).map_err(|_| UnicvError::CountMismatch {
                    structure: Structure::FileTableHeader,
                    field: "sector_count",
                    offset: page * page_size + 0x14,
                    expected: u64::from(u32::MAX),
                    actual: signatures.len() as u64,
                })?;

            let mut header = FileTableHeader::new(&self.config, sector_count);
            header.version = self.version;

            let blocks = signatures
                .chunks(capacity)
                .map(|chunk| SignatureBlock {
                    header: SignatureBlockHeader::new(capacity as u32, chunk.len() as u32),
                    signatures: chunk.to_vec(),
                })
                .collect::<Vec<_>>();

            let table = FileTable {
                page,
                header,
                blocks,
            };
            page += table.page_count();
            tables.push(table);
        }

        let mut header = DbHeader::new(self.config.page_size, (page - 1) * page_size);
        header.version = self.version;

        Ok(UnicvDb { header, tables })
    }

    /// Build and serialize in one step
    pub fn build_bytes(self) -> Result<Vec<u8>> {
        self.build()?.build()
    }
}

impl Default for UnicvDbBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_utils::test_invalid_data_rejected;
    use crate::unicv::constants::VERSION_1;

    #[test]
    fn test_builder_defaults() {
        let db = UnicvDbBuilder::new()
            .build()
            .expect("Should build empty database");

        assert_eq!(db.header.version, 2);
        assert_eq!(db.header.page_size, 0x400);
        assert_eq!(db.header.data_size, 0);
        assert!(db.tables.is_empty());
    }

    #[test]
    fn test_builder_splits_signatures() {
        let db = UnicvDbBuilder::new()
            .add_file(vec![Signature([9; 20]); 101])
            .build()
            .expect("Should build database");

        let table = &db.tables[0];
        assert_eq!(table.header.sector_count, 101);
        let counts: Vec<u32> = table.blocks.iter().map(|b| b.header.entry_count).collect();
        assert_eq!(counts, vec![50, 50, 1]);
        assert_eq!(db.header.data_size, 4 * 0x400);
    }

    #[test]
    fn test_builder_version_1() {
        let data = UnicvDbBuilder::new()
            .version(VERSION_1)
            .add_file(vec![Signature([1; 20]); 2])
            .build_bytes()
            .expect("Should build V1 database");

        let db = UnicvDb::parse(&data).expect("Should parse V1 database");
        assert_eq!(db.header.version, 1);
        assert_eq!(db.tables[0].header.version, 1);
    }

    #[test]
    fn test_builder_rejects_version_3() {
        let result = UnicvDbBuilder::new().version(3).build();
        assert!(matches!(
            result,
            Err(UnicvError::UnsupportedVersion { version: 3, .. })
        ));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = UnicvDbBuilder::new()
            .config(UnicvConfig::new().with_page_size(0x10))
            .build();
        assert!(matches!(result, Err(UnicvError::Config(_))));
    }

    #[test]
    fn test_page_size_mismatch_against_default_config() {
        let data = UnicvDbBuilder::new()
            .config(UnicvConfig::new().with_page_size(0x2000))
            .add_empty_file()
            .build_bytes()
            .unwrap();

        test_invalid_data_rejected::<UnicvDb>(&data).unwrap();
        let db = UnicvDb::parse_with_config(&data, &UnicvConfig::new().with_page_size(0x2000))
            .unwrap();
        assert_eq!(db.tables.len(), 1);
    }
}
