#![warn(clippy::all, clippy::pedantic)]

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Context;
use clap::Parser;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, Naming};
use fontify_engine::{ExtractOptions, FontifyContext, DEFAULT_THRESHOLD, STRIDES};

#[derive(Parser, Debug)]
#[command(version, about = "Builds a glyph atlas and a nearest shade index from a directory of 8-bit font sheets.", long_about = None)]
pub struct Args {
    /// Directory containing the font sheets
    #[arg(value_name = "FONTS_DIR")]
    fonts: PathBuf,

    #[arg(help = "Atlas image output, the format follows the extension.", long, default_value = "atlas.png")]
    atlas: PathBuf,

    #[arg(help = "Nearest shade index output.", long, default_value = "nearest.fnix")]
    index: PathBuf,

    #[arg(help = "Scan stride (8, 9 or 10), detected from the sheet width if omitted.", long, value_parser = parse_stride)]
    stride: Option<u32>,

    #[arg(help = "Pixels brighter than this value are ink.", long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    #[arg(help = "Write a log file to this directory.", long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

fn parse_stride(arg: &str) -> Result<u32, String> {
    let stride: u32 = arg.parse().map_err(|e: std::num::ParseIntError| e.to_string())?;
    if STRIDES.contains(&stride) {
        Ok(stride)
    } else {
        Err(format!("stride must be one of {STRIDES:?}"))
    }
}

fn start_logger(log_dir: Option<&Path>) -> anyhow::Result<flexi_logger::LoggerHandle> {
    let logger = Logger::try_with_env_or_str("info")?;
    let handle = if let Some(log_dir) = log_dir {
        std::fs::create_dir_all(log_dir).with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
        logger
            .log_to_file(FileSpec::default().directory(log_dir).basename("fontify").suffix("log").suppress_timestamp())
            .rotate(Criterion::Size(64 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
            .duplicate_to_stderr(flexi_logger::Duplicate::Warn)
            .start()?
    } else {
        logger.log_to_stderr().start()?
    };
    Ok(handle)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let options = ExtractOptions {
        stride: args.stride,
        threshold: args.threshold,
        ..Default::default()
    };

    let now = Instant::now();
    let mut ctx = FontifyContext::new(options);
    let sheets = ctx.ingest_dir(&args.fonts).with_context(|| format!("Failed to process {}", args.fonts.display()))?;
    if sheets == 0 {
        anyhow::bail!("No font sheets found in {}", args.fonts.display());
    }
    let output = ctx.finish()?;

    output.atlas.save(&args.atlas).with_context(|| format!("Failed to write atlas {}", args.atlas.display()))?;
    log::info!(
        "Wrote atlas {} ({}x{}, {} glyphs)",
        args.atlas.display(),
        output.atlas.width(),
        output.atlas.height(),
        output.glyphs.len()
    );

    let file = File::create(&args.index).with_context(|| format!("Failed to create {}", args.index.display()))?;
    let mut writer = BufWriter::new(file);
    output.index.write_to(&mut writer)?;
    writer.flush()?;
    log::info!("Wrote nearest index {} ({} entries)", args.index.display(), output.index.len());

    log::info!("Done in {:?}", now.elapsed());
    Ok(())
}

fn main() {
    let args = Args::parse();

    let logger = match start_logger(args.log_dir.as_deref()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err:#}");
            None
        }
    };

    log::info!("Starting fontify {}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = run(&args) {
        if logger.is_some() {
            log::error!("{err:#}");
        } else {
            eprintln!("{err:#}");
        }
        drop(logger);
        std::process::exit(1);
    }
}
