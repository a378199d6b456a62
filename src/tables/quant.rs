// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use tracing::{instrument, trace};

use super::MAX_TABLES;
use crate::byte_reader::ByteReader;
use crate::error::{Error, Result};
use crate::markers::Marker;
use crate::segments::SegmentList;
use crate::util::BoundedList;

pub const QUANT_TABLE_SIZE: usize = 64;

/// JPEG quantization table, borrowed from a DQT segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationTable<'a> {
    /// Table index (0-3)
    pub selector: u8,
    /// Precision (always 0, 8-bit)
    pub precision: u8,
    /// Quantization values in zigzag order
    pub values: &'a [u8; QUANT_TABLE_SIZE],
}

/// All quantization tables of an image, in the order they were defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantizationTables<'a> {
    tables: BoundedList<QuantizationTable<'a>, MAX_TABLES>,
}

impl<'a> QuantizationTables<'a> {
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &QuantizationTable<'a>> + '_ {
        self.tables.iter()
    }

    /// The table currently bound to `selector`: the last one defined for it.
    pub fn get(&self, selector: u8) -> Option<&QuantizationTable<'a>> {
        self.iter().rev().find(|t| t.selector == selector)
    }

    /// Parses every sub-table of every DQT segment, in encounter order.
    #[instrument(level = "debug", skip_all, err)]
    pub fn read(segments: &SegmentList<'a>) -> Result<Self> {
        let mut result = Self::default();
        for segment in segments.iter() {
            let mut br = ByteReader::new(segment.params());
            while !br.is_empty() {
                if result.tables.is_full() {
                    return Err(Error::TooManyQuantTables);
                }
                let (precision, selector) = br.read_nibbles()?;
                if precision != 0 {
                    return Err(Error::Unsupported16BitQuantTable);
                }
                if selector as usize >= MAX_TABLES {
                    return Err(Error::TableSelectorOutOfRange(Marker::Dqt, selector));
                }
                let values = br
                    .read_array::<QUANT_TABLE_SIZE>()
                    .map_err(|_| Error::InvalidDqt)?;
                trace!(selector, offset = segment.offset(), "quantization table");
                result
                    .tables
                    .try_push(QuantizationTable {
                        selector,
                        precision,
                        values,
                    })
                    .map_err(|_| Error::TooManyQuantTables)?;
            }
        }
        Ok(result)
    }
}
