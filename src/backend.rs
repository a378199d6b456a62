// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Parameter buffers for hardware baseline JPEG decoders.
//!
//! The layout follows the VA-API `JPEGBaseline` buffer types: one picture parameter buffer,
//! one inverse quantization matrix, one Huffman table buffer with two slots, and a single
//! slice covering the whole scan.

use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::headers::{McuRounding, MAX_COMPONENTS};
use crate::jpeg::JpegFile;
use crate::options::ParserOptions;
use crate::tables::{TableClass, HUFFMAN_CODE_LENGTHS, MAX_TABLES, QUANT_TABLE_SIZE};

/// Huffman table slots a baseline decode backend provides.
pub const BACKEND_HUFFMAN_SLOTS: usize = 2;

/// Largest DC value array: categories 0-11.
pub const MAX_DC_VALUES: usize = 12;

/// Largest AC value array.
pub const MAX_AC_VALUES: usize = 162;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PictureComponent {
    pub component_id: u8,
    pub h_sampling_factor: u8,
    pub v_sampling_factor: u8,
    pub quantiser_table_selector: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureParameters {
    pub picture_width: u16,
    pub picture_height: u16,
    pub num_components: u8,
    pub components: [PictureComponent; MAX_COMPONENTS],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IqMatrix {
    pub load_quantiser_table: [bool; MAX_TABLES],
    pub quantiser_table: [[u8; QUANT_TABLE_SIZE]; MAX_TABLES],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanSlot {
    pub num_dc_codes: [u8; HUFFMAN_CODE_LENGTHS],
    pub dc_values: [u8; MAX_DC_VALUES],
    pub num_ac_codes: [u8; HUFFMAN_CODE_LENGTHS],
    pub ac_values: [u8; MAX_AC_VALUES],
}

impl Default for HuffmanSlot {
    fn default() -> Self {
        Self {
            num_dc_codes: [0; HUFFMAN_CODE_LENGTHS],
            dc_values: [0; MAX_DC_VALUES],
            num_ac_codes: [0; HUFFMAN_CODE_LENGTHS],
            ac_values: [0; MAX_AC_VALUES],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HuffmanTableBuffer {
    pub load_huffman_table: [bool; BACKEND_HUFFMAN_SLOTS],
    pub huffman_table: [HuffmanSlot; BACKEND_HUFFMAN_SLOTS],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliceComponent {
    pub component_selector: u8,
    pub dc_table_selector: u8,
    pub ac_table_selector: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceParameters {
    pub slice_data_size: u32,
    pub num_components: u8,
    pub components: [SliceComponent; MAX_COMPONENTS],
    pub restart_interval: u16,
    pub num_mcus: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub mcu_rounding: McuRounding,
}

/// All buffers a backend needs to decode one image, plus the scan bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeParams<'a> {
    pub picture: PictureParameters,
    pub iq_matrix: IqMatrix,
    pub huffman_tables: HuffmanTableBuffer,
    pub slice: SliceParameters,
    pub slice_data: &'a [u8],
}

fn backend_slot(selector: u8) -> Result<usize> {
    let slot = selector as usize;
    if slot >= BACKEND_HUFFMAN_SLOTS {
        return Err(Error::BackendSlotUnavailable(selector));
    }
    Ok(slot)
}

fn copy_values(dst: &mut [u8], values: &[u8], class: TableClass, selector: u8) -> Result<()> {
    let max = dst.len();
    dst.get_mut(..values.len())
        .ok_or(Error::HuffmanValuesTooLong(
            class as u8,
            selector,
            values.len(),
            max,
        ))?
        .copy_from_slice(values);
    Ok(())
}

impl<'a> DecodeParams<'a> {
    #[instrument(level = "debug", skip_all, err)]
    pub fn build(file: &JpegFile<'a>, options: &BuildOptions) -> Result<DecodeParams<'a>> {
        let frame = &file.frame_header;
        let picture = PictureParameters {
            picture_width: frame.width,
            picture_height: frame.height,
            num_components: frame.num_components() as u8,
            components: array_init::array_init(|i| {
                frame
                    .components()
                    .get(i)
                    .map(|c| PictureComponent {
                        component_id: c.id,
                        h_sampling_factor: c.h_samp_factor,
                        v_sampling_factor: c.v_samp_factor,
                        quantiser_table_selector: c.quant_selector,
                    })
                    .unwrap_or_default()
            }),
        };

        let mut iq_matrix = IqMatrix {
            load_quantiser_table: [false; MAX_TABLES],
            quantiser_table: [[0; QUANT_TABLE_SIZE]; MAX_TABLES],
        };
        for table in file.quant_tables.iter() {
            let slot = table.selector as usize;
            iq_matrix.load_quantiser_table[slot] = true;
            iq_matrix.quantiser_table[slot] = *table.values;
        }

        let mut huffman_tables = HuffmanTableBuffer::default();
        for table in file.huffman_tables.iter() {
            let slot = backend_slot(table.selector)?;
            huffman_tables.load_huffman_table[slot] = true;
            let dst = &mut huffman_tables.huffman_table[slot];
            match table.class {
                TableClass::Dc => {
                    dst.num_dc_codes = *table.counts;
                    copy_values(&mut dst.dc_values, table.values, table.class, table.selector)?;
                }
                TableClass::Ac => {
                    dst.num_ac_codes = *table.counts;
                    copy_values(&mut dst.ac_values, table.values, table.class, table.selector)?;
                }
            }
        }

        let scan = &file.scan_header;
        let slice = SliceParameters {
            slice_data_size: u32::try_from(file.scan_data.len())
                .map_err(|_| Error::ScanDataTooLarge(file.scan_data.len()))?,
            num_components: scan.num_components() as u8,
            components: array_init::array_init(|i| {
                scan.components()
                    .get(i)
                    .map(|c| SliceComponent {
                        component_selector: c.selector,
                        dc_table_selector: c.dc_table,
                        ac_table_selector: c.ac_table,
                    })
                    .unwrap_or_default()
            }),
            restart_interval: file.restart_interval.0,
            num_mcus: file.mcu_count(options.mcu_rounding),
        };

        debug!(
            num_mcus = slice.num_mcus,
            slice_data_size = slice.slice_data_size,
            "built decode parameters"
        );
        Ok(DecodeParams {
            picture,
            iq_matrix,
            huffman_tables,
            slice,
            slice_data: file.scan_data,
        })
    }
}

/// A hardware decoder that turns parameter buffers into a decoded surface.
///
/// Implementations own their device, configuration and context; they must be done reading
/// `params.slice_data` when `decode` returns.
pub trait DecodeBackend {
    type Surface;
    type Error: From<Error>;

    fn decode(
        &mut self,
        params: &DecodeParams<'_>,
    ) -> std::result::Result<Self::Surface, Self::Error>;
}

/// Parses `data`, builds the parameter buffers and submits them to `backend`.
pub fn decode_jpeg<B: DecodeBackend>(
    backend: &mut B,
    data: &[u8],
    parser_options: &ParserOptions,
    build_options: &BuildOptions,
) -> std::result::Result<B::Surface, B::Error> {
    let file = JpegFile::parse_with_options(data, parser_options)?;
    let params = DecodeParams::build(&file, build_options)?;
    backend.decode(&params)
}
