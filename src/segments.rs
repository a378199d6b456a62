// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Marker segment scanner.
//!
//! Walks a JFIF byte stream, records a borrowed view of every segment the decoder needs and
//! locates the entropy-coded data that follows the scan header.

use tracing::{debug, instrument, trace};

use crate::byte_reader::ByteReader;
use crate::error::{Error, Result};
use crate::markers::{is_restart, Marker, MARKER_PREFIX, STUFFING};
use crate::options::ParserOptions;
use crate::util::BoundedList;

/// Maximum number of DQT or DHT segments in one image.
pub const MAX_REPEATED_SEGMENTS: usize = 4;

/// Size of the marker plus the length field in front of a parameter block.
pub const SEGMENT_PREFIX_SIZE: usize = 4;

/// A marker and its parameter block, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    marker: Marker,
    offset: usize,
    bytes: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Position of the marker in the input.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The whole segment, starting with the marker.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Value of the length field, which counts itself. Zero for SOI and EOI.
    pub fn declared_length(&self) -> usize {
        self.bytes.len() - 2
    }

    /// Parameter block after the length field.
    pub fn params(&self) -> &'a [u8] {
        self.bytes.get(SEGMENT_PREFIX_SIZE..).unwrap_or(&[])
    }
}

/// Segments of a repeatable marker kind, in encounter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentList<'a> {
    marker: Marker,
    segments: BoundedList<Segment<'a>, MAX_REPEATED_SEGMENTS>,
}

impl<'a> SegmentList<'a> {
    fn new(marker: Marker) -> Self {
        Self {
            marker,
            segments: BoundedList::default(),
        }
    }

    fn push(&mut self, segment: Segment<'a>) -> Result<()> {
        debug_assert_eq!(segment.marker, self.marker);
        self.segments
            .try_push(segment)
            .map_err(|_| Error::TooManySegments(self.marker))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment<'a>> + '_ {
        self.segments.iter()
    }
}

#[cfg(test)]
impl<'a> SegmentList<'a> {
    /// Reads back-to-back segments of one kind.
    pub(crate) fn read_all(marker: Marker, data: &'a [u8]) -> Self {
        let mut list = Self::new(marker);
        let mut pos = 0;
        while pos < data.len() {
            let segment = read_segment(data, pos, &ParserOptions::default()).unwrap();
            pos += segment.bytes.len();
            list.push(segment).unwrap();
        }
        list
    }
}

/// Every segment of interest in one image, plus the scan data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSet<'a> {
    pub soi: Segment<'a>,
    pub dqt: SegmentList<'a>,
    pub sof0: Segment<'a>,
    pub dht: SegmentList<'a>,
    pub sos: Segment<'a>,
    pub dri: Option<Segment<'a>>,
    /// Offset of the scan data in the input.
    pub scan_offset: usize,
    pub scan: &'a [u8],
    pub eoi: Segment<'a>,
}

struct SegmentCollector<'a> {
    soi: Option<Segment<'a>>,
    dqt: SegmentList<'a>,
    sof0: Option<Segment<'a>>,
    dht: SegmentList<'a>,
    sos: Option<Segment<'a>>,
    dri: Option<Segment<'a>>,
    scan: Option<(usize, &'a [u8])>,
    eoi: Option<Segment<'a>>,
}

impl<'a> SegmentCollector<'a> {
    fn new() -> Self {
        Self {
            soi: None,
            dqt: SegmentList::new(Marker::Dqt),
            sof0: None,
            dht: SegmentList::new(Marker::Dht),
            sos: None,
            dri: None,
            scan: None,
            eoi: None,
        }
    }

    fn record(&mut self, segment: Segment<'a>) -> Result<()> {
        let slot = match segment.marker {
            Marker::Dqt => return self.dqt.push(segment),
            Marker::Dht => return self.dht.push(segment),
            Marker::Soi => &mut self.soi,
            Marker::Sof0 => &mut self.sof0,
            Marker::Sos => &mut self.sos,
            Marker::Dri => &mut self.dri,
            Marker::Eoi => &mut self.eoi,
            other => return Err(Error::UnknownMarker(other.code())),
        };
        if slot.is_some() {
            return Err(Error::DuplicatedSegment(segment.marker));
        }
        *slot = Some(segment);
        Ok(())
    }

    fn finish(self) -> Result<SegmentSet<'a>> {
        match self {
            SegmentCollector {
                soi: Some(soi),
                dqt,
                sof0: Some(sof0),
                dht,
                sos: Some(sos),
                dri,
                scan: Some((scan_offset, scan)),
                eoi: Some(eoi),
            } if !dqt.is_empty() && !dht.is_empty() => Ok(SegmentSet {
                soi,
                dqt,
                sof0,
                dht,
                sos,
                dri,
                scan_offset,
                scan,
                eoi,
            }),
            _ => Err(Error::MissingSegments),
        }
    }
}

/// Returns the length of the entropy-coded data at the start of `data`: everything up to the
/// first marker that is neither a stuffed `0xff00` nor a restart marker.
pub fn scan_data_len(data: &[u8]) -> Result<usize> {
    data.windows(2)
        .position(|w| w[0] == MARKER_PREFIX && w[1] != STUFFING && !is_restart(w[1]))
        .ok_or(Error::ScanDataTruncated)
}

/// APP3-APP15 and COM are only accepted when every application segment is skipped.
fn check_accepted(marker: Marker, options: &ParserOptions) -> Result<()> {
    if marker.is_extra_skippable() && !options.skip_all_app_segments {
        return Err(Error::UnknownMarker(marker.code()));
    }
    Ok(())
}

fn should_skip(marker: Marker) -> bool {
    marker.is_common_app() || marker.is_extra_skippable()
}

/// Reads one marker and its parameter block starting at `offset`.
fn read_segment<'a>(
    data: &'a [u8],
    offset: usize,
    options: &ParserOptions,
) -> Result<Segment<'a>> {
    let mut br = ByteReader::new(&data[offset..]);
    if br.remaining() < 2 {
        return Err(Error::IncompleteFile);
    }
    let prefix = br.read_u8()?;
    if prefix != MARKER_PREFIX {
        return Err(Error::ExpectedMarker(prefix));
    }
    let marker = Marker::from_code(br.read_u8()?)?;
    check_accepted(marker, options)?;
    if marker.has_length() {
        let length = br
            .read_be16()
            .map_err(|_| Error::IncompleteSegment(marker))?;
        if length < 2 {
            return Err(Error::InvalidSegmentLength(marker, length));
        }
        br.skip(length as usize - 2)
            .map_err(|_| Error::SegmentTruncated(marker))?;
    }
    Ok(Segment {
        marker,
        offset,
        bytes: &data[offset..offset + br.position()],
    })
}

/// Walks `data` from SOI to EOI. Trailing bytes after EOI are ignored.
#[instrument(level = "debug", skip_all, fields(size = data.len()), err)]
pub fn scan_segments<'a>(data: &'a [u8], options: &ParserOptions) -> Result<SegmentSet<'a>> {
    match data {
        [MARKER_PREFIX, 0xd8, ..] => {}
        [a, b, ..] => return Err(Error::NotJpeg(*a, *b)),
        [a] => return Err(Error::NotJpeg(*a, 0)),
        [] => return Err(Error::NotJpeg(0, 0)),
    }

    let mut collector = SegmentCollector::new();
    let mut pos = 0;
    while pos < data.len() && collector.eoi.is_none() {
        let segment = read_segment(data, pos, options)?;
        pos += segment.bytes.len();

        if should_skip(segment.marker) {
            trace!(
                marker = ?segment.marker,
                offset = segment.offset,
                length = segment.declared_length(),
                "skipping segment"
            );
            continue;
        }
        trace!(
            marker = ?segment.marker,
            offset = segment.offset,
            length = segment.declared_length(),
            "segment"
        );
        collector.record(segment)?;

        if segment.marker == Marker::Sos {
            let scan_len = scan_data_len(&data[pos..])?;
            options.limits.check_scan_size(scan_len)?;
            debug!(offset = pos, size = scan_len, "scan data");
            collector.scan = Some((pos, &data[pos..pos + scan_len]));
            pos += scan_len;
        }
    }

    collector.finish()
}
