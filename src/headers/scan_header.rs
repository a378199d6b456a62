// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use tracing::{debug, instrument};

use super::MAX_COMPONENTS;
use crate::byte_reader::ByteReader;
use crate::error::{Error, Result};
use crate::markers::Marker;
use crate::segments::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanComponent {
    /// Matches a `FrameComponent::id`
    pub selector: u8,
    /// DC Huffman table selector
    pub dc_table: u8,
    /// AC Huffman table selector
    pub ac_table: u8,
}

/// Scan (SOS) header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanHeader {
    num_components: u8,
    components: [ScanComponent; MAX_COMPONENTS],
    /// Spectral selection start
    pub ss: u8,
    /// Spectral selection end
    pub se: u8,
    /// Successive approximation high bit
    pub ah: u8,
    /// Successive approximation low bit
    pub al: u8,
}

impl ScanHeader {
    #[instrument(level = "debug", skip_all, err)]
    pub fn read(segment: &Segment) -> Result<ScanHeader> {
        let mut br = ByteReader::new(segment.params());
        let num_components = br.read_u8().map_err(|_| Error::InvalidSos)?;
        if num_components == 0 {
            return Err(Error::InvalidSos);
        }
        if num_components as usize > MAX_COMPONENTS {
            return Err(Error::TooManyComponents(Marker::Sos, num_components));
        }

        let mut components = [ScanComponent::default(); MAX_COMPONENTS];
        for component in components.iter_mut().take(num_components as usize) {
            let selector = br.read_u8().map_err(|_| Error::InvalidSos)?;
            let (dc_table, ac_table) = br.read_nibbles().map_err(|_| Error::InvalidSos)?;
            *component = ScanComponent {
                selector,
                dc_table,
                ac_table,
            };
        }

        // Baseline streams always carry 0, 63, 0; tolerate them being cut off.
        let (ss, se, (ah, al)) = match br.read_array::<3>() {
            Ok(&[ss, se, a]) => (ss, se, (a >> 4, a & 0xf)),
            Err(_) => (0, 63, (0, 0)),
        };

        let header = ScanHeader {
            num_components,
            components,
            ss,
            se,
            ah,
            al,
        };
        debug!(?header);
        Ok(header)
    }

    pub fn num_components(&self) -> usize {
        self.num_components as usize
    }

    pub fn components(&self) -> &[ScanComponent] {
        &self.components[..self.num_components()]
    }
}
