//! imgview - inspect, sample and encode image regions
//!
//! Every command works on a view: the whole image, or the rectangle given
//! with `--region x,y,w,h`.

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use imgview_core::Rect;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "imgview")]
#[command(author, version, about = "Inspect, sample and encode image regions")]
#[command(long_about = "
Read-only views over PNG, JPEG and TIFF images.

Examples:
  imgview info a.png b.tif                      # Size, pixel format, solidity
  imgview pixel a.png 10 20                     # Sample one pixel
  imgview save a.png out.jpg --region 0,0,64,64 # Encode a region
  imgview save a.png out.png -f png8 --palette web.act
  imgview solid tiles/*.png                     # Solidity on the worker pool
  imgview tiles big.tif -o tiles/ --size 256 --skip-solid
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of worker threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image and view information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Print the value of one pixel
    #[command(visible_alias = "p")]
    Pixel(PixelArgs),

    /// Encode a view to a file
    #[command(visible_alias = "s")]
    Save(SaveArgs),

    /// Check views for a uniform color in the background
    Solid(SolidArgs),

    /// Split an image into tiles and encode them in the background
    #[command(visible_alias = "t")]
    Tiles(TilesArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// View region: x,y,w,h
    #[arg(short, long, value_parser = commands::parse_region)]
    region: Option<Rect>,
}

#[derive(Args)]
struct PixelArgs {
    /// Input image
    input: PathBuf,

    /// X coordinate within the view
    #[arg(allow_negative_numbers = true)]
    x: i64,

    /// Y coordinate within the view
    #[arg(allow_negative_numbers = true)]
    y: i64,

    /// View region: x,y,w,h
    #[arg(short, long, value_parser = commands::parse_region)]
    region: Option<Rect>,
}

#[derive(Args)]
struct SaveArgs {
    /// Input image
    input: PathBuf,

    /// Output file
    output: PathBuf,

    /// View region: x,y,w,h
    #[arg(short, long, value_parser = commands::parse_region)]
    region: Option<Rect>,

    /// Output format string (png, png8, jpeg85, tiff:compression=lzw, ...)
    #[arg(short, long)]
    format: Option<String>,

    /// Palette file for indexed PNG (.act = RGB triples, otherwise RGBA)
    #[arg(long)]
    palette: Option<PathBuf>,
}

#[derive(Args)]
struct SolidArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// View region: x,y,w,h
    #[arg(short, long, value_parser = commands::parse_region)]
    region: Option<Rect>,
}

#[derive(Args)]
struct TilesArgs {
    /// Input image
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Tile edge length in pixels
    #[arg(short, long, default_value = "256")]
    size: u32,

    /// Output format string
    #[arg(short, long, default_value = "png")]
    format: String,

    /// Do not write tiles that are a single color
    #[arg(long)]
    skip_solid: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let verbose = cli.verbose > 0;

    match cli.command {
        Commands::Info(args) => commands::info::run(args, verbose),
        Commands::Pixel(args) => commands::pixel::run(args),
        Commands::Save(args) => commands::save::run(args, verbose),
        Commands::Solid(args) => commands::solid::run(args, cli.threads),
        Commands::Tiles(args) => commands::tiles::run(args, cli.threads, verbose),
    }
}
