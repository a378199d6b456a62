// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder};

/// Reads bytes from a borrowed buffer. Every read is bounds-checked.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Constructs a ByteReader for a given range of data.
    pub fn new(data: &'a [u8]) -> ByteReader<'a> {
        ByteReader { data, pos: 0 }
    }

    /// Reads a single byte.
    /// ```
    /// # use jpegdec::byte_reader::ByteReader;
    /// let mut br = ByteReader::new(&[0xff, 0xd8]);
    /// assert_eq!(br.read_u8()?, 0xff);
    /// assert_eq!(br.read_u8()?, 0xd8);
    /// assert!(br.read_u8().is_err());
    /// # Ok::<(), jpegdec::error::Error>(())
    /// ```
    pub fn read_u8(&mut self) -> Result<u8> {
        let b = *self.data.get(self.pos).ok_or(Error::OutOfBounds)?;
        self.pos += 1;
        Ok(b)
    }

    /// Reads a big-endian 16-bit value.
    /// ```
    /// # use jpegdec::byte_reader::ByteReader;
    /// let mut br = ByteReader::new(&[0x01, 0x02, 0x03]);
    /// assert_eq!(br.read_be16()?, 0x0102);
    /// assert!(br.read_be16().is_err());
    /// assert_eq!(br.position(), 2);
    /// # Ok::<(), jpegdec::error::Error>(())
    /// ```
    pub fn read_be16(&mut self) -> Result<u16> {
        let bytes = self.peek_bytes(2)?;
        self.pos += 2;
        Ok(BigEndian::read_u16(bytes))
    }

    /// Reads a byte and splits it into its high and low nibbles.
    pub fn read_nibbles(&mut self) -> Result<(u8, u8)> {
        let b = self.read_u8()?;
        Ok((b >> 4, b & 0xf))
    }

    /// Returns the next `num` bytes and advances past them.
    pub fn read_bytes(&mut self, num: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(num)?;
        self.pos += num;
        Ok(bytes)
    }

    /// Returns a reference to the next `N` bytes and advances past them.
    pub fn read_array<const N: usize>(&mut self) -> Result<&'a [u8; N]> {
        let bytes = self.peek_bytes(N)?;
        let array = bytes.try_into().map_err(|_| Error::OutOfBounds)?;
        self.pos += N;
        Ok(array)
    }

    /// Returns the next `num` bytes without consuming them.
    pub fn peek_bytes(&self, num: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(num).ok_or(Error::OutOfBounds)?;
        self.data.get(self.pos..end).ok_or(Error::OutOfBounds)
    }

    /// Skips `num` bytes.
    pub fn skip(&mut self, num: usize) -> Result<()> {
        self.read_bytes(num).map(|_| ())
    }

    /// Returns the number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
