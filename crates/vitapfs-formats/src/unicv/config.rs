//! Parser configuration
//!
//! The defaults are the format constants. Overriding them selects a different
//! page size class; it never turns a check off.

use crate::unicv::constants::{
    DB_HEADER_SIZE, EXPECTED_FILE_SECTOR_SIZE, EXPECTED_PAGE_SIZE, FTBL_HEADER_SIZE,
    SIG_BLOCK_HEADER_SIZE, SIGNATURE_SIZE,
};
use crate::unicv::error::{Result, UnicvError};
use crate::unicv::layout::max_entries_per_page;
use serde::{Deserialize, Serialize};

/// `unicv.db` parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnicvConfig {
    /// Page size every header must declare
    pub page_size: u32,
    /// File sector size every file table must declare
    pub file_sector_size: u32,
}

impl Default for UnicvConfig {
    fn default() -> Self {
        Self {
            page_size: EXPECTED_PAGE_SIZE,
            file_sector_size: EXPECTED_FILE_SECTOR_SIZE,
        }
    }
}

impl UnicvConfig {
    /// Create a configuration with the format defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expected page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the expected file sector size
    pub fn with_file_sector_size(mut self, file_sector_size: u32) -> Self {
        self.file_sector_size = file_sector_size;
        self
    }

    /// Signature entries per page for this page size
    pub fn max_entries_per_page(&self) -> u32 {
        max_entries_per_page(SIGNATURE_SIZE, self.page_size)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let min_page = DB_HEADER_SIZE
            .max(FTBL_HEADER_SIZE)
            .max(SIG_BLOCK_HEADER_SIZE + SIGNATURE_SIZE);
        if self.page_size < min_page {
            return Err(UnicvError::Config(format!(
                "page_size 0x{:X} is smaller than the minimum 0x{:X}",
                self.page_size, min_page
            )));
        }

        if self.file_sector_size == 0 {
            return Err(UnicvError::Config(
                "file_sector_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_format_constants() {
        let config = UnicvConfig::default();
        assert_eq!(config.page_size, 0x400);
        assert_eq!(config.file_sector_size, 0x8000);
        assert_eq!(config.max_entries_per_page(), 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tiny_page_rejected() {
        let config = UnicvConfig::new().with_page_size(0x10);
        assert!(matches!(config.validate(), Err(UnicvError::Config(_))));
    }

    #[test]
    fn test_zero_sector_size_rejected() {
        let config = UnicvConfig::new().with_file_sector_size(0);
        assert!(matches!(config.validate(), Err(UnicvError::Config(_))));
    }

    #[test]
    fn test_serde_partial_document_uses_defaults() {
        let config: UnicvConfig = serde_json::from_str(r#"{"page_size": 8192}"#).unwrap();
        assert_eq!(config.page_size, 0x2000);
        assert_eq!(config.file_sector_size, 0x8000);

        let json = serde_json::to_string(&config).unwrap();
        let back: UnicvConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
