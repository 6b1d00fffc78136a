//! Save command: encode a view to a file.

use crate::SaveArgs;
use anyhow::{Context, Result};
use imgview_io::{encode, file_options};
use std::fs;

pub fn run(args: SaveArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let view = super::open_view(&image, args.region)?;

    // resolve the format before touching anything on disk
    let options = file_options(&args.output, args.format.as_deref())?;
    let palette = args.palette.as_deref().map(super::load_palette).transpose()?;

    if verbose {
        println!("Encoding {} of {} as {}", view.region(), args.input.display(), options);
    }

    let bytes = encode(&view, &options, palette.as_ref())
        .with_context(|| format!("Failed to encode: {}", args.output.display()))?;
    fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to save: {}", args.output.display()))?;

    if verbose {
        println!("Wrote {} ({})", args.output.display(), super::format_size(bytes.len() as u64));
    }

    Ok(())
}
