use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stitcher")]
#[command(version, about = "Stitch images into one editable atlas and split it back", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Pack every image in a directory into one atlas plus metadata
    Stitch(StitchArgs),
    /// Split an atlas back and overwrite the original files
    Unstitch(UnstitchArgs),
    /// Write a config file with the default settings
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct StitchArgs {
    /// Directory containing the source images
    #[arg(short, long, value_name = "DIR")]
    pub dir: PathBuf,

    /// Output atlas image, must be PNG [default: stitched_atlas.png]
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Output metadata file [default: stitched_meta.json]
    #[arg(short, long, value_name = "FILE")]
    pub meta: Option<PathBuf>,

    /// Load settings from a stitcher config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Padding around every image in pixels [default: 20]
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// Do not draw outlines around images
    #[arg(long)]
    pub no_guides: bool,

    /// Do not mark the canvas corners against auto-cropping
    #[arg(long)]
    pub no_sentinels: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct UnstitchArgs {
    /// Atlas image, possibly edited since stitching
    #[arg(short, long, value_name = "FILE")]
    pub img: PathBuf,

    /// Metadata written when the atlas was stitched
    #[arg(short, long, value_name = "FILE")]
    pub meta: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InitConfigArgs {
    /// Where to write the config file
    #[arg(default_value = "stitcher.json")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
