// Copyright (c) the JPEG XL Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{eyre, Result, WrapErr};
use jpegdec::headers::McuRounding;
use jpegdec::{BuildOptions, DecodeParams, JpegFile, ParserLimits, ParserOptions};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Rounding {
    /// Drop partial MCUs at the image edges
    Truncate,
    /// Count partial MCUs at the image edges
    Ceil,
}

impl From<Rounding> for McuRounding {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::Truncate => McuRounding::Truncate,
            Rounding::Ceil => McuRounding::Ceil,
        }
    }
}

#[derive(Parser)]
struct Opt {
    /// Input JPEG files
    #[clap(required = true)]
    inputs: Vec<PathBuf>,

    /// How partial MCUs are counted
    #[clap(long, value_enum, default_value_t = Rounding::Ceil)]
    mcu_rounding: Rounding,

    /// Skip APP3-APP15 and COM segments instead of rejecting them
    #[clap(long)]
    skip_app_segments: bool,

    /// Reject images with more pixels than this
    #[clap(long)]
    max_pixels: Option<u64>,

    /// Print the full parsed structures
    #[clap(long, short)]
    verbose: bool,

    /// Print the decode backend parameter buffers
    #[clap(long)]
    params: bool,
}

fn inspect(path: &Path, opt: &Opt) -> Result<()> {
    let file = File::open(path).wrap_err_with(|| format!("Cannot open {path:?}"))?;
    // SAFETY: the map is read-only and outlives every view parsed from it.
    let data = unsafe { Mmap::map(&file) }.wrap_err_with(|| format!("Cannot map {path:?}"))?;

    let parser_options = ParserOptions {
        limits: ParserLimits {
            max_pixels: opt.max_pixels,
            ..ParserLimits::default()
        },
        skip_all_app_segments: opt.skip_app_segments,
    };
    let jpeg = JpegFile::parse_with_options(&data, &parser_options)
        .map_err(|err| eyre!("{path:?}: {err} ({:?} error)", err.kind()))?;

    let build_options = BuildOptions {
        mcu_rounding: opt.mcu_rounding.into(),
    };
    println!(
        "{}: {} x {}, {} components, {} MCUs, {} bytes of scan data",
        path.display(),
        jpeg.width(),
        jpeg.height(),
        jpeg.frame_header.num_components(),
        jpeg.mcu_count(build_options.mcu_rounding),
        jpeg.scan_data.len()
    );
    if opt.verbose {
        println!("{jpeg:#?}");
    }
    if opt.params {
        let params = DecodeParams::build(&jpeg, &build_options)
            .map_err(|err| eyre!("{path:?}: {err} ({:?} error)", err.kind()))?;
        println!("{:#?}", params.picture);
        println!("{:#?}", params.iq_matrix);
        println!("{:#?}", params.huffman_tables);
        println!("{:#?}", params.slice);
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    run(&Opt::parse())
}

/// Inspects every input, then fails with the reason for each file that could not be parsed.
fn run(opt: &Opt) -> Result<()> {
    let mut failures = vec![];
    for path in &opt.inputs {
        if let Err(err) = inspect(path, opt) {
            error!("{err:?}");
            failures.push(format!("{err:#}"));
        }
    }
    info!(files = opt.inputs.len(), failures = failures.len(), "done");

    if !failures.is_empty() {
        return Err(eyre!(
            "{} of {} files failed:\n{}",
            failures.len(),
            opt.inputs.len(),
            failures.join("\n")
        ));
    }
    Ok(())
}
