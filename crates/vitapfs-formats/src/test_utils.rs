//! Test utilities for format round-trip and corruption testing
//!
//! This module provides shared test utilities to reduce code duplication
//! across format test modules.

use crate::PfsFormat;
use std::fmt::Debug;

/// Test round-trip serialization for a format instance
///
/// Verifies that a format can be serialized and deserialized back
/// to an equivalent value.
pub fn test_round_trip<T>(original: &T) -> Result<(), Box<dyn std::error::Error>>
where
    T: PfsFormat + PartialEq + Debug,
{
    let data = original.build()?;
    let parsed = T::parse(&data)?;

    if original != &parsed {
        return Err(format!(
            "Round-trip verification failed:\nOriginal: {:?}\nParsed: {:?}",
            original, parsed
        )
        .into());
    }

    Ok(())
}

/// Test that parsing invalid data fails appropriately
pub fn test_invalid_data_rejected<T>(invalid_data: &[u8]) -> Result<(), Box<dyn std::error::Error>>
where
    T: PfsFormat,
{
    match T::parse(invalid_data) {
        Ok(_) => Err("Expected parsing to fail for invalid data, but it succeeded".into()),
        Err(_) => Ok(()),
    }
}

/// Copy of `data` with the byte at `offset` replaced
pub fn corrupt_byte(data: &[u8], offset: usize, value: u8) -> Vec<u8> {
    let mut out = data.to_vec();
    out[offset] = value;
    out
}
