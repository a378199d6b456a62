// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Helpers for synthesizing JPEG marker streams in tests.

/// Quantization table with entries 1..=64.
pub const QUANT_TABLE: [u8; 64] = {
    let mut table = [0u8; 64];
    let mut i = 0;
    while i < 64 {
        table[i] = i as u8 + 1;
        i += 1;
    }
    table
};

pub const DC_COUNTS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
pub const DC_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

pub const AC_COUNTS: [u8; 16] = [0, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
pub const AC_VALUES: [u8; 3] = [0x01, 0x00, 0x11];

/// Entropy-coded bytes of [`minimal_baseline`], including a stuffed `0xff`.
pub const MINIMAL_SCAN: [u8; 6] = [0xfc, 0xff, 0x00, 0x2a, 0x8a, 0x28];

pub const JFIF_APP0: [u8; 14] = [
    b'J', b'F', b'I', b'F', 0, 1, 1, 0, 0, 1, 0, 1, 0, 0,
];

/// Appends markers and segments to a byte stream.
#[derive(Debug, Default, Clone)]
pub struct JpegBuilder {
    data: Vec<u8>,
}

impl JpegBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker(mut self, code: u8) -> Self {
        self.data.extend_from_slice(&[0xff, code]);
        self
    }

    pub fn soi(self) -> Self {
        self.marker(0xd8)
    }

    pub fn eoi(self) -> Self {
        self.marker(0xd9)
    }

    /// Writes a segment with a correct length field.
    pub fn segment(self, code: u8, params: &[u8]) -> Self {
        let length = u16::try_from(params.len() + 2).expect("segment too long");
        self.segment_with_length(code, length, params)
    }

    /// Writes a segment with an arbitrary length field.
    pub fn segment_with_length(mut self, code: u8, length: u16, params: &[u8]) -> Self {
        self = self.marker(code);
        self.data.extend_from_slice(&length.to_be_bytes());
        self.data.extend_from_slice(params);
        self
    }

    pub fn app(self, n: u8, payload: &[u8]) -> Self {
        assert!(n < 16);
        self.segment(0xe0 + n, payload)
    }

    /// One DQT segment with one 8-bit table.
    pub fn dqt(self, selector: u8, table: &[u8; 64]) -> Self {
        self.dqt_tables(&[(selector, table)])
    }

    /// One DQT segment with several 8-bit tables.
    pub fn dqt_tables(self, tables: &[(u8, &[u8; 64])]) -> Self {
        let mut params = vec![];
        for (selector, table) in tables {
            params.push(*selector);
            params.extend_from_slice(&table[..]);
        }
        self.segment(0xdb, &params)
    }

    /// Baseline frame header with 8-bit precision. Components are (id, h, v, tq).
    pub fn sof0(self, height: u16, width: u16, components: &[(u8, u8, u8, u8)]) -> Self {
        let mut params = vec![8];
        params.extend_from_slice(&height.to_be_bytes());
        params.extend_from_slice(&width.to_be_bytes());
        params.push(components.len() as u8);
        for &(id, h, v, tq) in components {
            params.extend_from_slice(&[id, (h << 4) | v, tq]);
        }
        self.segment(0xc0, &params)
    }

    /// One DHT segment with one table.
    pub fn dht(self, class: u8, selector: u8, counts: &[u8; 16], values: &[u8]) -> Self {
        self.dht_tables(&[(class, selector, counts, values)])
    }

    /// One DHT segment with several tables, given as (class, selector, counts, values).
    pub fn dht_tables(self, tables: &[(u8, u8, &[u8; 16], &[u8])]) -> Self {
        let mut params = vec![];
        for (class, selector, counts, values) in tables {
            params.push((class << 4) | selector);
            params.extend_from_slice(&counts[..]);
            params.extend_from_slice(values);
        }
        self.segment(0xc4, &params)
    }

    /// Scan header for a full sequential scan. Components are (selector, dc, ac).
    pub fn sos(self, components: &[(u8, u8, u8)]) -> Self {
        let mut params = vec![components.len() as u8];
        for &(selector, dc, ac) in components {
            params.extend_from_slice(&[selector, (dc << 4) | ac]);
        }
        params.extend_from_slice(&[0x00, 0x3f, 0x00]);
        self.segment(0xda, &params)
    }

    pub fn dri(self, interval: u16) -> Self {
        self.segment(0xdd, &interval.to_be_bytes())
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    /// Appends the tables, headers, scan and EOI of [`minimal_baseline`].
    pub fn build_minimal_tail(self) -> Vec<u8> {
        self.dqt(0, &QUANT_TABLE)
            .sof0(16, 16, &[(1, 1, 1, 0)])
            .dht(0, 0, &DC_COUNTS, &DC_VALUES)
            .dht(1, 0, &AC_COUNTS, &AC_VALUES)
            .sos(&[(1, 0, 0)])
            .bytes(&MINIMAL_SCAN)
            .eoi()
            .build()
    }
}

/// A 16x16 single-component baseline image.
pub fn minimal_baseline() -> Vec<u8> {
    JpegBuilder::new()
        .soi()
        .app(0, &JFIF_APP0)
        .build_minimal_tail()
}

/// A 32x16 three-component 4:2:0 image with a restart interval and two of each table.
pub fn ycbcr_420() -> Vec<u8> {
    let chroma: [u8; 64] = std::array::from_fn(|i| 64 - i as u8);
    JpegBuilder::new()
        .soi()
        .app(0, &JFIF_APP0)
        .dqt_tables(&[(0, &QUANT_TABLE), (1, &chroma)])
        .sof0(16, 32, &[(1, 2, 2, 0), (2, 1, 1, 1), (3, 1, 1, 1)])
        .dht_tables(&[
            (0, 0, &DC_COUNTS, &DC_VALUES[..]),
            (1, 0, &AC_COUNTS, &AC_VALUES[..]),
        ])
        .dht_tables(&[
            (0, 1, &DC_COUNTS, &DC_VALUES[..]),
            (1, 1, &AC_COUNTS, &AC_VALUES[..]),
        ])
        .dri(1)
        .sos(&[(1, 0, 0), (2, 1, 1), (3, 1, 1)])
        .bytes(&[0xfc, 0xff, 0x00, 0x2a, 0xff, 0xd0, 0x8a, 0x28])
        .eoi()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_length_counts_itself() {
        let data = JpegBuilder::new().segment(0xdd, &[0, 4]).build();
        assert_eq!(data, [0xff, 0xdd, 0, 4, 0, 4]);
    }

    #[test]
    fn minimal_layout() {
        let data = minimal_baseline();
        assert_eq!(&data[..2], &[0xff, 0xd8]);
        assert_eq!(&data[data.len() - 2..], &[0xff, 0xd9]);
        assert_eq!(DC_COUNTS.iter().map(|&c| c as usize).sum::<usize>(), DC_VALUES.len());
        assert_eq!(AC_COUNTS.iter().map(|&c| c as usize).sum::<usize>(), AC_VALUES.len());
    }
}
