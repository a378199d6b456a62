// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use tracing::{debug, instrument};

use super::{BLOCK_DIM, MAX_COMPONENTS};
use crate::byte_reader::ByteReader;
use crate::error::{Error, Result};
use crate::markers::Marker;
use crate::segments::Segment;

/// How partial MCUs at the right and bottom edges are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum McuRounding {
    /// Drop partial MCUs.
    Truncate,
    /// Count partial MCUs as whole ones.
    #[default]
    Ceil,
}

impl McuRounding {
    fn divide(self, samples: u32, mcu_size: u32) -> u32 {
        match self {
            McuRounding::Truncate => samples / mcu_size,
            McuRounding::Ceil => samples.div_ceil(mcu_size),
        }
    }
}

/// JPEG component information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameComponent {
    /// Component ID
    pub id: u8,
    /// Horizontal sampling factor
    pub h_samp_factor: u8,
    /// Vertical sampling factor
    pub v_samp_factor: u8,
    /// Quantization table selector
    pub quant_selector: u8,
}

/// Baseline (SOF0) frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Sample precision in bits
    pub precision: u8,
    pub height: u16,
    pub width: u16,
    num_components: u8,
    components: [FrameComponent; MAX_COMPONENTS],
}

impl FrameHeader {
    #[instrument(level = "debug", skip_all, err)]
    pub fn read(segment: &Segment) -> Result<FrameHeader> {
        let mut br = ByteReader::new(segment.params());
        let precision = br.read_u8().map_err(|_| Error::InvalidSof0)?;
        let height = br.read_be16().map_err(|_| Error::InvalidSof0)?;
        let width = br.read_be16().map_err(|_| Error::InvalidSof0)?;
        let num_components = br.read_u8().map_err(|_| Error::InvalidSof0)?;
        if num_components == 0 {
            return Err(Error::InvalidSof0);
        }
        if num_components as usize > MAX_COMPONENTS {
            return Err(Error::TooManyComponents(Marker::Sof0, num_components));
        }

        let mut components = [FrameComponent::default(); MAX_COMPONENTS];
        for component in components.iter_mut().take(num_components as usize) {
            let params = br.read_array::<3>().map_err(|_| Error::InvalidSof0)?;
            let [id, sampling, quant_selector] = *params;
            let (h_samp_factor, v_samp_factor) = (sampling >> 4, sampling & 0xf);
            if h_samp_factor == 0 || v_samp_factor == 0 {
                return Err(Error::InvalidSamplingFactor(
                    id,
                    h_samp_factor,
                    v_samp_factor,
                ));
            }
            *component = FrameComponent {
                id,
                h_samp_factor,
                v_samp_factor,
                quant_selector,
            };
        }

        let header = FrameHeader {
            precision,
            height,
            width,
            num_components,
            components,
        };
        debug!(?header);
        Ok(header)
    }

    pub fn num_components(&self) -> usize {
        self.num_components as usize
    }

    pub fn components(&self) -> &[FrameComponent] {
        &self.components[..self.num_components()]
    }

    /// MCU columns, sized by the first component's horizontal sampling factor.
    pub fn mcu_columns(&self, rounding: McuRounding) -> u32 {
        let h = self.components[0].h_samp_factor as u32;
        rounding.divide(self.width as u32, BLOCK_DIM * h)
    }

    /// MCU rows, sized by the first component's vertical sampling factor.
    pub fn mcu_rows(&self, rounding: McuRounding) -> u32 {
        let v = self.components[0].v_samp_factor as u32;
        rounding.divide(self.height as u32, BLOCK_DIM * v)
    }

    pub fn mcu_count(&self, rounding: McuRounding) -> u32 {
        self.mcu_columns(rounding) * self.mcu_rows(rounding)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::segments::SegmentList;
    use jpegdec_test_utils::JpegBuilder;
    use test_log::test;

    fn read(data: &[u8]) -> Result<FrameHeader> {
        let segments = SegmentList::read_all(Marker::Sof0, data);
        let header = FrameHeader::read(segments.iter().next().unwrap());
        header
    }

    #[test]
    fn four_components() {
        let data = JpegBuilder::new()
            .sof0(
                480,
                640,
                &[(1, 2, 2, 0), (2, 1, 1, 1), (3, 1, 1, 1), (4, 1, 1, 2)],
            )
            .build();
        let header = read(&data).unwrap();
        assert_eq!(header.precision, 8);
        assert_eq!(header.height, 480);
        assert_eq!(header.width, 640);
        assert_eq!(header.num_components(), 4);
        assert_eq!(
            header.components()[0],
            FrameComponent {
                id: 1,
                h_samp_factor: 2,
                v_samp_factor: 2,
                quant_selector: 0
            }
        );
        assert_eq!(header.components()[3].id, 4);
        assert_eq!(header.components()[3].quant_selector, 2);
    }

    #[test]
    fn too_many_components() {
        let components = [(1, 1, 1, 0); 5];
        let data = JpegBuilder::new().sof0(8, 8, &components).build();
        let err = read(&data).unwrap_err();
        assert_eq!(err, Error::TooManyComponents(Marker::Sof0, 5));
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }

    #[test]
    fn no_components() {
        let data = JpegBuilder::new().sof0(8, 8, &[]).build();
        assert_eq!(read(&data), Err(Error::InvalidSof0));
    }

    #[test]
    fn short_payload() {
        let data = JpegBuilder::new()
            .segment(0xc0, &[8, 0, 16, 0, 16, 2, 1, 0x11, 0])
            .build();
        assert_eq!(read(&data), Err(Error::InvalidSof0));

        let data = JpegBuilder::new().segment(0xc0, &[8, 0, 16]).build();
        assert_eq!(read(&data), Err(Error::InvalidSof0));
    }

    #[test]
    fn zero_sampling_factor() {
        let data = JpegBuilder::new().sof0(8, 8, &[(7, 0, 1, 0)]).build();
        assert_eq!(read(&data), Err(Error::InvalidSamplingFactor(7, 0, 1)));
    }

    #[test]
    fn mcu_count() {
        let data = JpegBuilder::new()
            .sof0(100, 150, &[(1, 2, 1, 0), (2, 1, 1, 1), (3, 1, 1, 1)])
            .build();
        let header = read(&data).unwrap();
        assert_eq!(header.mcu_columns(McuRounding::Truncate), 9);
        assert_eq!(header.mcu_rows(McuRounding::Truncate), 12);
        assert_eq!(header.mcu_count(McuRounding::Truncate), 108);
        assert_eq!(header.mcu_columns(McuRounding::Ceil), 10);
        assert_eq!(header.mcu_rows(McuRounding::Ceil), 13);
        assert_eq!(header.mcu_count(McuRounding::Ceil), 130);
    }

    #[test]
    fn mcu_count_exact() {
        let data = JpegBuilder::new().sof0(16, 32, &[(1, 2, 2, 0)]).build();
        let header = read(&data).unwrap();
        assert_eq!(header.mcu_count(McuRounding::Truncate), 2);
        assert_eq!(header.mcu_count(McuRounding::Ceil), 2);
    }
}
