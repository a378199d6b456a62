// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::{Error, Result};

pub const MARKER_PREFIX: u8 = 0xff;

/// Second byte of a byte-stuffed `0xff` inside entropy-coded data.
pub const STUFFING: u8 = 0x00;

/// Marker codes the parser knows about.
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Marker {
    /// Baseline DCT frame header.
    Sof0 = 0xc0,
    /// Huffman table(s).
    Dht = 0xc4,
    /// Start of image.
    Soi = 0xd8,
    /// End of image.
    Eoi = 0xd9,
    /// Start of scan.
    Sos = 0xda,
    /// Quantization table(s).
    Dqt = 0xdb,
    /// Restart interval.
    Dri = 0xdd,
    App0 = 0xe0,
    App1 = 0xe1,
    App2 = 0xe2,
    App3 = 0xe3,
    App4 = 0xe4,
    App5 = 0xe5,
    App6 = 0xe6,
    App7 = 0xe7,
    App8 = 0xe8,
    App9 = 0xe9,
    App10 = 0xea,
    App11 = 0xeb,
    App12 = 0xec,
    App13 = 0xed,
    App14 = 0xee,
    App15 = 0xef,
    /// Comment.
    Com = 0xfe,
}

impl Marker {
    pub fn from_code(code: u8) -> Result<Marker> {
        Self::from_u8(code).ok_or(Error::UnknownMarker(code))
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether a length-prefixed parameter block follows the marker.
    pub fn has_length(self) -> bool {
        !matches!(self, Marker::Soi | Marker::Eoi)
    }

    /// `APP0`-`APP2`, always skipped.
    pub fn is_common_app(self) -> bool {
        matches!(self, Marker::App0 | Marker::App1 | Marker::App2)
    }

    /// Markers that are only skipped when the parser is asked to.
    pub fn is_extra_skippable(self) -> bool {
        let code = self.code();
        (0xe3..=0xef).contains(&code) || self == Marker::Com
    }
}

/// Restart markers `RST0`-`RST7` may appear inside entropy-coded data.
pub fn is_restart(code: u8) -> bool {
    (0xd0..=0xd7).contains(&code)
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn classify() {
        assert_eq!(Marker::from_code(0xc0), Ok(Marker::Sof0));
        assert_eq!(Marker::from_code(0xdd), Ok(Marker::Dri));
        assert_eq!(Marker::from_code(0xc2), Err(Error::UnknownMarker(0xc2)));
        assert_eq!(Marker::from_code(0x00), Err(Error::UnknownMarker(0x00)));
        assert!(!Marker::Soi.has_length());
        assert!(Marker::Sos.has_length());
        assert!(Marker::App2.is_common_app());
        assert!(!Marker::App3.is_common_app());
        assert!(Marker::App15.is_extra_skippable());
        assert!(Marker::Com.is_extra_skippable());
        assert!(!Marker::App0.is_extra_skippable());
    }

    #[test]
    fn restart_codes() {
        assert!((0xd0..=0xd7).all(is_restart));
        assert!(!is_restart(0xd8));
        assert!(!is_restart(0xcf));
    }
}
