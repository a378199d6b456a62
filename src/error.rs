// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

use crate::markers::Marker;

/// Coarse classification of parse failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-spec byte layout.
    Format,
    /// A count or selector exceeds a fixed internal capacity.
    Capacity,
    /// Structurally valid, but not implemented.
    Unsupported,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Read out of bounds")]
    OutOfBounds,
    #[error("Not a JPEG: found {0:02x}{1:02x}, expected ffd8")]
    NotJpeg(u8, u8),
    #[error("Incomplete jpeg file")]
    IncompleteFile,
    #[error("Expected segment marker, found {0:02x}")]
    ExpectedMarker(u8),
    #[error("Unknown marker 0xff{0:02x}")]
    UnknownMarker(u8),
    #[error("Duplicated segment {0:?}")]
    DuplicatedSegment(Marker),
    #[error("Too many {0:?} segments")]
    TooManySegments(Marker),
    #[error("Incomplete jpeg segment {0:?}")]
    IncompleteSegment(Marker),
    #[error("Invalid length {1} for segment {0:?}")]
    InvalidSegmentLength(Marker, u16),
    #[error("Segment {0:?} runs past the end of the buffer")]
    SegmentTruncated(Marker),
    #[error("Scan data runs past the end of the buffer")]
    ScanDataTruncated,
    #[error("Missing jpeg segments")]
    MissingSegments,
    #[error("Invalid dqt")]
    InvalidDqt,
    #[error("Invalid dht")]
    InvalidDht,
    #[error("Invalid sof0")]
    InvalidSof0,
    #[error("Invalid sos")]
    InvalidSos,
    #[error("Invalid dri")]
    InvalidDri,
    #[error("Invalid Huffman table class {0}")]
    InvalidHuffmanClass(u8),
    #[error("Invalid sampling factor {1}x{2} for component {0}")]
    InvalidSamplingFactor(u8, u8, u8),
    #[error("Too many dqt")]
    TooManyQuantTables,
    #[error("Too many dht")]
    TooManyHuffmanTables,
    #[error("Table selector {1} out of range in {0:?}")]
    TableSelectorOutOfRange(Marker, u8),
    #[error("Too many components in {0:?}: {1}, max is 4")]
    TooManyComponents(Marker, u8),
    #[error("Image size too large: {0}x{1}")]
    ImageTooLarge(u16, u16),
    #[error("Scan data too large: {0} bytes")]
    ScanDataTooLarge(usize),
    #[error("Huffman table slot {0} not available in the decode backend")]
    BackendSlotUnavailable(u8),
    #[error("Huffman table class {0} slot {1} has {2} values, max is {3}")]
    HuffmanValuesTooLong(u8, u8, usize, usize),
    #[error("16-bit quantization table")]
    Unsupported16BitQuantTable,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TooManyQuantTables
            | Error::TooManyHuffmanTables
            | Error::TableSelectorOutOfRange(..)
            | Error::TooManyComponents(..)
            | Error::ImageTooLarge(..)
            | Error::ScanDataTooLarge(_)
            | Error::BackendSlotUnavailable(_)
            | Error::HuffmanValuesTooLong(..) => ErrorKind::Capacity,
            Error::Unsupported16BitQuantTable => ErrorKind::Unsupported,
            _ => ErrorKind::Format,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
