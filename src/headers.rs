// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod frame_header;
pub mod restart;
pub mod scan_header;

pub use frame_header::*;
pub use restart::*;
pub use scan_header::*;

/// Maximum number of components in a frame or a scan.
pub const MAX_COMPONENTS: usize = 4;

/// Side of a DCT block, in samples.
pub const BLOCK_DIM: u32 = 8;
