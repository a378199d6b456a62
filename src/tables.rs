// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod huffman;
pub mod quant;

pub use huffman::*;
pub use quant::*;

/// Number of table selectors, and the maximum number of sub-tables of one kind per image.
pub const MAX_TABLES: usize = 4;
