// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::byte_reader::ByteReader;
use crate::error::{Error, Result};
use crate::segments::Segment;

/// Number of MCUs between restart markers. Zero disables restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestartInterval(pub u16);

impl RestartInterval {
    pub fn read(segment: &Segment) -> Result<RestartInterval> {
        let mut br = ByteReader::new(segment.params());
        let interval = br.read_be16().map_err(|_| Error::InvalidDri)?;
        Ok(RestartInterval(interval))
    }

    /// Reads the DRI segment if there is one.
    pub fn read_optional(segment: Option<&Segment>) -> Result<RestartInterval> {
        segment.map_or(Ok(RestartInterval::default()), Self::read)
    }

    pub fn is_enabled(&self) -> bool {
        self.0 != 0
    }
}
