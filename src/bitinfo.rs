// abif: Decoding ABIF sequencer trace files and re-calling bases.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! Bounds-checked, big-endian view over a byte buffer.
//!
//! ABIF stores every multi-byte integer and float in big-endian order
//! regardless of the host. [BitInfo] hides the byte order and refuses to read
//! past the end of its buffer.

use bstr::ByteSlice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutOfRangeError {
    pub offset: usize,
    pub length: usize,
    pub buffer_len: usize,
}

impl std::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "read of {} bytes at offset {} exceeds buffer of {} bytes", self.length, self.offset, self.buffer_len)
    }
}

impl std::error::Error for OutOfRangeError {}

/// Types that can be read from big-endian bytes with [BitInfo::read].
pub trait BigEndian: Sized {
    /// Width of the encoded value in bytes.
    const SIZE: usize;

    /// Decode from exactly [SIZE](BigEndian::SIZE) bytes.
    fn from_be_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_big_endian {
    ($($t:ty),*) => {
        $(
            impl BigEndian for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                fn from_be_slice(bytes: &[u8]) -> Self {
                    let mut arr = [0_u8; std::mem::size_of::<$t>()];
                    arr.copy_from_slice(bytes);
                    <$t>::from_be_bytes(arr)
                }
            }
        )*
    };
}

impl_big_endian!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

/// An owned byte buffer with typed, bounds-checked reads.
///
/// ## Usage
///
/// ```rust
/// use abif::bitinfo::BitInfo;
///
/// let bytes = BitInfo::new(vec![0x00, 0x65, b'A', b'B', b'I', b'F']);
///
/// assert_eq!(bytes.read::<i16>(0).unwrap(), 101);
/// assert_eq!(bytes.read_ascii(2, None).unwrap(), "ABIF");
/// assert!(bytes.read::<i32>(4).is_err());
/// ```
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitInfo {
    buffer: Vec<u8>,
}

impl BitInfo {
    pub fn new(
        buffer: Vec<u8>,
    ) -> Self {
        BitInfo { buffer }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.buffer.clone()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    fn bytes_at(
        &self,
        offset: usize,
        length: usize,
    ) -> Result<&[u8], OutOfRangeError> {
        let end = offset.checked_add(length);
        match end {
            Some(end) if end <= self.buffer.len() => Ok(&self.buffer[offset..end]),
            _ => Err(OutOfRangeError { offset, length, buffer_len: self.buffer.len() }),
        }
    }

    /// Read a big-endian value of type `T` starting at `offset`.
    pub fn read<T: BigEndian>(
        &self,
        offset: usize,
    ) -> Result<T, OutOfRangeError> {
        Ok(T::from_be_slice(self.bytes_at(offset, T::SIZE)?))
    }

    /// Read `length` bytes starting at `offset` as text.
    ///
    /// With `length` None, reads everything from `offset` to the end of the
    /// buffer. Bytes outside ASCII are replaced with U+FFFD.
    pub fn read_ascii(
        &self,
        offset: usize,
        length: Option<usize>,
    ) -> Result<String, OutOfRangeError> {
        let length = match length {
            Some(length) => length,
            None => self.buffer.len().checked_sub(offset).ok_or(OutOfRangeError { offset, length: 0, buffer_len: self.buffer.len() })?,
        };
        Ok(self.bytes_at(offset, length)?.to_str_lossy().into_owned())
    }

    /// Copy `length` bytes starting at `offset` into a new view.
    pub fn slice(
        &self,
        offset: usize,
        length: usize,
    ) -> Result<BitInfo, OutOfRangeError> {
        Ok(BitInfo::new(self.bytes_at(offset, length)?.to_vec()))
    }
}

impl From<Vec<u8>> for BitInfo {
    fn from(buffer: Vec<u8>) -> Self {
        BitInfo::new(buffer)
    }
}

impl From<&[u8]> for BitInfo {
    fn from(buffer: &[u8]) -> Self {
        BitInfo::new(buffer.to_vec())
    }
}
