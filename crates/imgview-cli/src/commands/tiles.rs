//! Tiles command: split an image into views and encode each in the
//! background.

use crate::TilesArgs;
use anyhow::{Context, Result, bail};
use imgview_core::{ImageView, Rect};
use imgview_io::{EncodeOptions, encode};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Stats {
    written: Cell<usize>,
    skipped: Cell<usize>,
    errors: RefCell<Vec<String>>,
}

fn tile_path(dir: &std::path::Path, tile: Rect, size: u32, ext: &str) -> PathBuf {
    dir.join(format!("{}_{}.{ext}", tile.x / size, tile.y / size))
}

pub fn run(args: TilesArgs, threads: usize, verbose: bool) -> Result<()> {
    if args.size == 0 {
        bail!("tile size must be at least 1");
    }
    let options = EncodeOptions::parse(&args.format)?;
    let ext = options.format().extension();
    let image = super::load_image(&args.input)?;
    super::ensure_dir(&args.output)?;

    let runner = super::runner(threads)?;
    let stats = Rc::new(Stats::default());

    for tile in image.bounds().tiles(args.size, args.size) {
        let view = Arc::new(ImageView::new(&image, tile)?);
        let path = tile_path(&args.output, tile, args.size, ext);
        let skip_solid = args.skip_solid;
        let stats = Rc::clone(&stats);

        runner.submit(
            view,
            move |view: &ImageView| -> Result<Option<Vec<u8>>> {
                if skip_solid && view.is_solid() {
                    return Ok(None);
                }
                Ok(Some(encode(view, &options, None)?))
            },
            move |result| {
                let outcome = result.and_then(|bytes| match bytes {
                    None => {
                        stats.skipped.set(stats.skipped.get() + 1);
                        Ok(())
                    }
                    Some(bytes) => {
                        std::fs::write(&path, &bytes)
                            .with_context(|| format!("Failed to save: {}", path.display()))?;
                        debug!(path = %path.display(), bytes = bytes.len(), "tile written");
                        stats.written.set(stats.written.get() + 1);
                        Ok(())
                    }
                });
                if let Err(e) = outcome {
                    stats.errors.borrow_mut().push(format!("{tile}: {e:#}"));
                }
            },
        );
    }

    runner.run();
    info!(
        written = stats.written.get(),
        skipped = stats.skipped.get(),
        "tiling finished"
    );

    if verbose {
        println!(
            "{} tiles written, {} solid tiles skipped",
            stats.written.get(),
            stats.skipped.get()
        );
    }

    let errors = stats.errors.borrow();
    if let Some(first) = errors.first() {
        bail!("{} tiles failed, first: {first}", errors.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_tile_path() {
        let dir = Path::new("out");
        assert_eq!(tile_path(dir, Rect::new(512, 256, 10, 256), 256, "png"), dir.join("2_1.png"));
    }
}
