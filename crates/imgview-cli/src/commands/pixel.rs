//! Pixel query command.

use crate::PixelArgs;
use anyhow::Result;

/// Prints the pixel at `(x, y)` of the view, or `undefined` outside it.
pub fn run(args: PixelArgs) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let view = super::open_view(&image, args.region)?;

    match view.get_pixel(args.x, args.y) {
        Some(value) => println!("{value}"),
        None => println!("undefined"),
    }

    Ok(())
}
