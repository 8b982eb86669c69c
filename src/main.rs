use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::Rgba;
use log::info;

use stitcher::cli::{CliArgs, Command, CompressionLevel, InitConfigArgs, StitchArgs, UnstitchArgs};
use stitcher::config::{CompressConfig, LoadedConfig, StitchConfig, save_config};
use stitcher::pipeline::{PackOptions, PackOutcome, pack, unpack};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    match &cli.command {
        Command::Stitch(args) => {
            // Load config before logging so a bad config file fails fast
            let merged = merge_config_with_args(args)?;
            init_logging(args.verbose);
            run_stitch(args, merged)
        }
        Command::Unstitch(args) => {
            init_logging(args.verbose);
            run_unstitch(args)
        }
        Command::InitConfig(args) => {
            init_logging(false);
            run_init_config(args)
        }
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Stitcher v{}", env!("CARGO_PKG_VERSION"));
}

fn run_stitch(args: &StitchArgs, merged: MergedConfig) -> Result<()> {
    let outcome = pack(&args.dir, &merged.atlas, &merged.metadata, &merged.options)?;

    match outcome {
        PackOutcome::Packed(report) => {
            let (w, h) = report.canvas_size();
            info!(
                "Packed {} images ({} skipped) into a {}x{} atlas",
                report.packed,
                report.skipped.len(),
                w,
                h
            );
            info!("Keep the canvas size unchanged and stay inside the outlines when editing");
        }
        PackOutcome::NoImages { skipped } => {
            info!(
                "No images found in {} ({} unreadable); nothing written",
                args.dir.display(),
                skipped.len()
            );
        }
    }

    Ok(())
}

fn run_unstitch(args: &UnstitchArgs) -> Result<()> {
    // Drift and per-file results are logged while unpacking
    unpack(&args.img, &args.meta)?;
    Ok(())
}

fn run_init_config(args: &InitConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    save_config(&StitchConfig::default(), &args.path)?;
    info!("Wrote default config to {}", args.path.display());

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    atlas: PathBuf,
    metadata: PathBuf,
    options: PackOptions,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &StitchArgs) -> Result<MergedConfig> {
    let loaded = if let Some(config_path) = &args.config {
        LoadedConfig::load(config_path)
            .with_context(|| format!("failed to load config: {}", config_path.display()))?
    } else {
        LoadedConfig {
            config: StitchConfig::default(),
            config_dir: PathBuf::from("."),
        }
    };
    let config = &loaded.config;

    let atlas = args.out.clone().unwrap_or_else(|| loaded.resolve_atlas());
    let metadata = args.meta.clone().unwrap_or_else(|| loaded.resolve_metadata());

    // Flags can only switch annotations off
    let guides = config.guides && !args.no_guides;
    let sentinels = config.sentinels && !args.no_sentinels;

    let compress = if args.compress.is_some() {
        args.compress
    } else {
        config
            .compress
            .as_ref()
            .map(parse_compress_config)
            .transpose()?
    };

    Ok(MergedConfig {
        atlas,
        metadata,
        options: PackOptions {
            padding: args.padding.unwrap_or(config.padding),
            guides,
            sentinels,
            guide_color: Rgba(config.guide_color),
            extensions: config.extensions.clone(),
            compress,
        },
    })
}

fn parse_compress_config(compress: &CompressConfig) -> Result<CompressionLevel> {
    match compress {
        CompressConfig::Level(n) if *n <= 6 => Ok(CompressionLevel::Level(*n)),
        CompressConfig::Max(s) if s.eq_ignore_ascii_case("max") => Ok(CompressionLevel::Max),
        CompressConfig::Level(n) => bail!("compress level in config must be 0-6, got {}", n),
        CompressConfig::Max(s) => bail!("unknown compress value '{}' in config file", s),
    }
}
