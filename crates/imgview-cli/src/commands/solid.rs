//! Solidity command: checks every input on the worker pool.

use crate::SolidArgs;
use anyhow::Result;
use imgview_core::{ImageView, probe};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use tracing::info;

pub fn run(args: SolidArgs, threads: usize) -> Result<()> {
    let runner = super::runner(threads)?;
    let failures = Rc::new(Cell::new(0usize));

    for path in &args.input {
        let image = super::load_image(path)?;
        let view = Arc::new(super::open_view(&image, args.region)?);
        let name = path.display().to_string();
        let failures = Rc::clone(&failures);

        runner.submit(
            view,
            |view: &ImageView| Ok::<_, anyhow::Error>(probe(&view.view())?),
            move |result| match result {
                Ok(s) => match s.value {
                    Some(value) if s.solid => println!("{name}: solid {value}"),
                    _ => println!("{name}: not solid"),
                },
                Err(e) => {
                    eprintln!("{name}: {e}");
                    failures.set(failures.get() + 1);
                }
            },
        );
    }

    let done = runner.run();
    info!(checked = done, threads = runner.threads(), "solidity checks finished");

    match failures.get() {
        0 => Ok(()),
        n => anyhow::bail!("{n} of {done} checks failed"),
    }
}
