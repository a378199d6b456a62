// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Parser configuration and resource limits.

use crate::error::{Error, Result};

/// Recommended safe maximum for `width * height`.
pub const DEFAULT_MAX_PIXELS: u64 = 1 << 28;

/// Recommended safe maximum for the entropy-coded scan (64MB).
pub const DEFAULT_MAX_SCAN_SIZE: usize = 64 * 1024 * 1024;

/// Configurable limits for the parser.
///
/// By default, all limits are `None` (unlimited). Use
/// [`ParserLimits::default_safe()`] for untrusted input.
///
/// ```
/// use jpegdec::options::ParserLimits;
///
/// let limits = ParserLimits::default_safe();
/// assert!(limits.max_pixels.is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParserLimits {
    /// Maximum `width * height` from the frame header.
    pub max_pixels: Option<u64>,
    /// Maximum size in bytes of the entropy-coded scan.
    pub max_scan_size: Option<usize>,
}

impl ParserLimits {
    pub fn default_safe() -> Self {
        Self {
            max_pixels: Some(DEFAULT_MAX_PIXELS),
            max_scan_size: Some(DEFAULT_MAX_SCAN_SIZE),
        }
    }

    pub(crate) fn check_dimensions(&self, width: u16, height: u16) -> Result<()> {
        match self.max_pixels {
            Some(max) if width as u64 * height as u64 > max => {
                Err(Error::ImageTooLarge(width, height))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn check_scan_size(&self, size: usize) -> Result<()> {
        match self.max_scan_size {
            Some(max) if size > max => Err(Error::ScanDataTooLarge(size)),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParserOptions {
    pub limits: ParserLimits,
    /// Also skip `APP3`-`APP15` and `COM` segments instead of rejecting them.
    /// Only `APP0`-`APP2` are skipped when this is false.
    pub skip_all_app_segments: bool,
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn unlimited_by_default() {
        let limits = ParserLimits::default();
        assert_eq!(limits.check_dimensions(u16::MAX, u16::MAX), Ok(()));
        assert_eq!(limits.check_scan_size(usize::MAX), Ok(()));
    }

    #[test]
    fn limits_are_inclusive() {
        let limits = ParserLimits {
            max_pixels: Some(64 * 64),
            max_scan_size: Some(10),
        };
        assert_eq!(limits.check_dimensions(64, 64), Ok(()));
        assert_eq!(
            limits.check_dimensions(65, 64),
            Err(Error::ImageTooLarge(65, 64))
        );
        assert_eq!(limits.check_scan_size(10), Ok(()));
        assert_eq!(limits.check_scan_size(11), Err(Error::ScanDataTooLarge(11)));
    }
}
