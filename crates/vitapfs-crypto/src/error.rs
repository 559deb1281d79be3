//! Error types for crypto engine dispatch

use thiserror::Error;

/// Errors that can occur when dispatching to a crypto engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Key length does not match the declared key size
    #[error("Invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize {
        /// Expected key size in bytes
        expected: usize,
        /// Actual key size in bytes
        actual: usize,
    },

    /// Software key size outside 128, 192 and 256 bits
    #[error("Unsupported key size: {0} bits")]
    UnsupportedKeySize(u32),

    /// Source and destination buffers are unusable for the block size
    #[error("Invalid buffer size: src {src}, dst {dst}, block size {block_size}")]
    InvalidBufferSize {
        /// Source length in bytes
        src: usize,
        /// Destination length in bytes
        dst: usize,
        /// Cipher block size in bytes
        block_size: u32,
    },

    /// Block size of zero
    #[error("Invalid block size: {0}")]
    InvalidBlockSize(u32),

    /// Backend returned a non-zero status
    #[error("Crypto engine returned status {0}")]
    EngineStatus(i32),
}

/// Map a backend status code to a result (0 is success)
pub fn check_status(status: i32) -> Result<(), CryptoError> {
    if status == 0 {
        Ok(())
    } else {
        Err(CryptoError::EngineStatus(status))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert_eq!(check_status(0), Ok(()));
        assert_eq!(check_status(-1), Err(CryptoError::EngineStatus(-1)));
        assert_eq!(
            check_status(0x8001_0016_u32 as i32).unwrap_err().to_string(),
            format!("Crypto engine returned status {}", 0x8001_0016_u32 as i32)
        );
    }
}
