//! Exact-size reads with offset-tagged errors

use crate::unicv::error::{Result, Structure, UnicvError};
use binrw::BinRead;
use std::io::{Cursor, Read, Seek};

/// Current stream position, with `expected` as the error offset
pub(crate) fn position<R: Seek>(reader: &mut R, expected: u64) -> Result<u64> {
    reader
        .stream_position()
        .map_err(|e| UnicvError::io(expected, e))
}

/// Read exactly `len` bytes that start at `offset`
pub(crate) fn read_bytes<R: Read>(reader: &mut R, offset: u64, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .map_err(|e| UnicvError::io(offset, e))?;
    Ok(buf)
}

/// Read a fixed-size little-endian record
///
/// The full record is read before decoding so a short stream surfaces as an
/// I/O error rather than a partially decoded value.
pub(crate) fn read_record<T, R>(reader: &mut R, offset: u64, size: u32) -> Result<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
    R: Read,
{
    let buf = read_bytes(reader, offset, size as usize)?;
    Ok(T::read_le(&mut Cursor::new(buf))?)
}

/// Read `len` bytes and require all of them to be zero
pub(crate) fn read_zero_padding<R: Read>(
    reader: &mut R,
    structure: Structure,
    field: &'static str,
    offset: u64,
    len: u64,
) -> Result<()> {
    let buf = read_bytes(reader, offset, len as usize)?;
    match buf.iter().position(|&b| b != 0) {
        Some(index) => Err(UnicvError::NonZeroPadding {
            structure,
            field,
            offset: offset + index as u64,
            value: buf[index],
        }),
        None => Ok(()),
    }
}
