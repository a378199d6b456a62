// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use tracing::{instrument, trace};

use super::MAX_TABLES;
use crate::byte_reader::ByteReader;
use crate::error::{Error, Result};
use crate::markers::Marker;
use crate::segments::SegmentList;
use crate::util::BoundedList;

/// Number of code lengths (1-16) in a table specification.
pub const HUFFMAN_CODE_LENGTHS: usize = 16;

#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}

impl TableClass {
    pub fn from_code(code: u8) -> Result<TableClass> {
        Self::from_u8(code).ok_or(Error::InvalidHuffmanClass(code))
    }
}

/// JPEG Huffman table, borrowed from a DHT segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanTable<'a> {
    pub class: TableClass,
    /// Table slot (0-3)
    pub selector: u8,
    /// Number of codes for each length (1-16)
    pub counts: &'a [u8; HUFFMAN_CODE_LENGTHS],
    /// Symbol values, as many as the counts add up to
    pub values: &'a [u8],
}

/// All Huffman tables of an image, in the order they were defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HuffmanTables<'a> {
    tables: BoundedList<HuffmanTable<'a>, MAX_TABLES>,
}

impl<'a> HuffmanTables<'a> {
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HuffmanTable<'a>> + '_ {
        self.tables.iter()
    }

    /// The table currently bound to (`class`, `selector`).
    pub fn get(&self, class: TableClass, selector: u8) -> Option<&HuffmanTable<'a>> {
        self.iter()
            .rev()
            .find(|t| t.class == class && t.selector == selector)
    }

    /// Parses every sub-table of every DHT segment, in encounter order.
    #[instrument(level = "debug", skip_all, err)]
    pub fn read(segments: &SegmentList<'a>) -> Result<Self> {
        let mut result = Self::default();
        for segment in segments.iter() {
            let mut br = ByteReader::new(segment.params());
            while !br.is_empty() {
                if result.tables.is_full() {
                    return Err(Error::TooManyHuffmanTables);
                }
                let (class, selector) = br.read_nibbles()?;
                let class = TableClass::from_code(class)?;
                if selector as usize >= MAX_TABLES {
                    return Err(Error::TableSelectorOutOfRange(Marker::Dht, selector));
                }
                let counts = br
                    .read_array::<HUFFMAN_CODE_LENGTHS>()
                    .map_err(|_| Error::InvalidDht)?;
                let num_values: usize = counts.iter().map(|&c| c as usize).sum();
                let values = br.read_bytes(num_values).map_err(|_| Error::InvalidDht)?;
                trace!(?class, selector, num_values, "huffman table");
                result
                    .tables
                    .try_push(HuffmanTable {
                        class,
                        selector,
                        counts,
                        values,
                    })
                    .map_err(|_| Error::TooManyHuffmanTables)?;
            }
        }
        Ok(result)
    }
}
