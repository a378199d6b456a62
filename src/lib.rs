// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#![deny(unsafe_code)]
pub mod backend;
pub mod byte_reader;
pub mod error;
pub mod headers;
pub mod jpeg;
pub mod markers;
pub mod options;
pub mod segments;
pub mod tables;
pub mod util;

pub use backend::{decode_jpeg, BuildOptions, DecodeBackend, DecodeParams};
pub use error::{Error, ErrorKind, Result};
pub use jpeg::JpegFile;
pub use options::{ParserLimits, ParserOptions};
