// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Whole-file parsing of baseline JPEG streams.
//!
//! [`JpegFile::parse`] scans the marker segments, then decodes DQT, SOF0, DHT, SOS and DRI in
//! that order. Every table and the scan data borrow from the input buffer.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::headers::{FrameHeader, McuRounding, RestartInterval, ScanHeader};
use crate::options::ParserOptions;
use crate::segments::{scan_segments, SegmentSet};
use crate::tables::{HuffmanTables, QuantizationTables};

/// Everything a baseline decoder needs from one JPEG file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegFile<'a> {
    pub segments: SegmentSet<'a>,
    pub quant_tables: QuantizationTables<'a>,
    pub frame_header: FrameHeader,
    pub huffman_tables: HuffmanTables<'a>,
    pub scan_header: ScanHeader,
    pub restart_interval: RestartInterval,
    /// Entropy-coded data following the scan header.
    pub scan_data: &'a [u8],
}

impl<'a> JpegFile<'a> {
    pub fn parse(data: &'a [u8]) -> Result<JpegFile<'a>> {
        Self::parse_with_options(data, &ParserOptions::default())
    }

    #[instrument(level = "debug", skip_all, fields(size = data.len()), err)]
    pub fn parse_with_options(data: &'a [u8], options: &ParserOptions) -> Result<JpegFile<'a>> {
        let segments = scan_segments(data, options)?;

        let quant_tables = QuantizationTables::read(&segments.dqt)?;
        let frame_header = FrameHeader::read(&segments.sof0)?;
        options
            .limits
            .check_dimensions(frame_header.width, frame_header.height)?;
        let huffman_tables = HuffmanTables::read(&segments.dht)?;
        let scan_header = ScanHeader::read(&segments.sos)?;
        let restart_interval = RestartInterval::read_optional(segments.dri.as_ref())?;

        debug!(
            width = frame_header.width,
            height = frame_header.height,
            components = frame_header.num_components(),
            quant_tables = quant_tables.len(),
            huffman_tables = huffman_tables.len(),
            restart_interval = restart_interval.0,
            scan_size = segments.scan.len(),
            "parsed jpeg"
        );

        Ok(JpegFile {
            scan_data: segments.scan,
            segments,
            quant_tables,
            frame_header,
            huffman_tables,
            scan_header,
            restart_interval,
        })
    }

    pub fn width(&self) -> u16 {
        self.frame_header.width
    }

    pub fn height(&self) -> u16 {
        self.frame_header.height
    }

    pub fn mcu_count(&self, rounding: McuRounding) -> u32 {
        self.frame_header.mcu_count(rounding)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::options::ParserLimits;
    use crate::tables::TableClass;
    use jpegdec_test_utils::{
        minimal_baseline, ycbcr_420, JpegBuilder, AC_COUNTS, AC_VALUES, DC_COUNTS, DC_VALUES,
        MINIMAL_SCAN, QUANT_TABLE,
    };
    use test_log::test;

    #[test]
    fn minimal() {
        let data = minimal_baseline();
        let file = JpegFile::parse(&data).unwrap();
        assert_eq!((file.width(), file.height()), (16, 16));
        assert_eq!(file.frame_header.precision, 8);
        assert_eq!(file.frame_header.components()[0].id, 1);
        assert_eq!(file.quant_tables.get(0).unwrap().values, &QUANT_TABLE);
        let dc = file.huffman_tables.get(TableClass::Dc, 0).unwrap();
        assert_eq!((dc.counts, dc.values), (&DC_COUNTS, &DC_VALUES[..]));
        let ac = file.huffman_tables.get(TableClass::Ac, 0).unwrap();
        assert_eq!((ac.counts, ac.values), (&AC_COUNTS, &AC_VALUES[..]));
        assert_eq!(file.scan_header.components()[0].selector, 1);
        assert_eq!(file.restart_interval, RestartInterval(0));
        assert_eq!(file.scan_data, &MINIMAL_SCAN);
        assert_eq!(file.mcu_count(McuRounding::Ceil), 4);
    }

    #[test]
    fn subsampled_with_restarts() {
        let data = ycbcr_420();
        let file = JpegFile::parse(&data).unwrap();
        assert_eq!((file.width(), file.height()), (32, 16));
        assert_eq!(file.frame_header.num_components(), 3);
        assert_eq!(file.quant_tables.len(), 2);
        assert_eq!(file.huffman_tables.len(), 4);
        assert_eq!(file.segments.dht.len(), 2);
        assert_eq!(file.scan_header.num_components(), 3);
        assert_eq!(file.scan_header.components()[2].dc_table, 1);
        assert_eq!(file.restart_interval, RestartInterval(1));
        assert_eq!(file.mcu_count(McuRounding::Truncate), 2);
        assert_eq!(file.scan_data.len(), 8);
    }

    #[test]
    fn idempotent() {
        let data = ycbcr_420();
        assert_eq!(JpegFile::parse(&data), JpegFile::parse(&data));
    }

    #[test]
    fn dqt_cut_short_by_its_length() {
        let data = JpegBuilder::new()
            .soi()
            .segment(0xdb, &[0x00, 0x01, 0x02])
            .build_minimal_tail();
        let err = JpegFile::parse(&data).unwrap_err();
        assert_eq!(err, Error::InvalidDqt);
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn five_quant_tables() {
        let data = JpegBuilder::new()
            .soi()
            .dqt_tables(&[(1, &QUANT_TABLE), (2, &QUANT_TABLE), (3, &QUANT_TABLE)])
            .dqt(1, &QUANT_TABLE)
            .build_minimal_tail();
        let err = JpegFile::parse(&data).unwrap_err();
        assert_eq!(err, Error::TooManyQuantTables);
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }

    #[test]
    fn sixteen_bit_quant_table() {
        let mut params = vec![0x10];
        params.extend_from_slice(&[1; 128]);
        let data = JpegBuilder::new()
            .soi()
            .segment(0xdb, &params)
            .build_minimal_tail();
        let err = JpegFile::parse(&data).unwrap_err();
        assert_eq!(err, Error::Unsupported16BitQuantTable);
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn pixel_limit() {
        let data = minimal_baseline();
        let options = ParserOptions {
            limits: ParserLimits {
                max_pixels: Some(255),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            JpegFile::parse_with_options(&data, &options),
            Err(Error::ImageTooLarge(16, 16))
        );
        let options = ParserOptions {
            limits: ParserLimits::default_safe(),
            ..Default::default()
        };
        assert!(JpegFile::parse_with_options(&data, &options).is_ok());
    }
}
