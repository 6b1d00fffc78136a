//! Image info command.

use crate::InfoArgs;
use anyhow::Result;
use imgview_io::Format;
use std::fs;

/// Prints size, pixel format and solidity of each input's view.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    for path in &args.input {
        let file_size = fs::metadata(path)?.len();
        let image = super::load_image(path)?;
        let view = super::open_view(&image, args.region)?;

        println!("{}", path.display());
        println!("  Resolution: {}x{}", image.width(), image.height());
        println!("  Format:     {}", image.format());
        if args.region.is_some() {
            println!("  View:       {}", view.region());
        }
        println!("  Solid:      {}", view.is_solid());
        println!("  File size:  {}", super::format_size(file_size));

        if verbose {
            let format = Format::from_extension(path);
            println!("  Container:  {}", format.mime_type());
            println!("  Premult:    {}", image.is_premultiplied());
            if let Some(value) = view.get_pixel(0, 0) {
                println!("  Pixel 0,0:  {value}");
            }
        }

        if args.input.len() > 1 {
            println!();
        }
    }

    Ok(())
}
