//! Host entry point and image objects.

use crate::{HostError, HostResult, ImageViewObject, Value};
use imgview_core::{Image, ImageView, Rect};
use imgview_task::{RunnerConfig, TaskRunner};
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

/// The embedding side: owns the task runner whose callbacks it dispatches.
///
/// Asynchronous methods return immediately; their callbacks fire during
/// [`poll`](Self::poll) or [`run`](Self::run), the host's event loop turn.
#[derive(Debug, Clone)]
pub struct Host {
    runner: Rc<TaskRunner>,
}

impl Host {
    /// Creates a host with its own worker pool.
    pub fn new(config: &RunnerConfig) -> HostResult<Self> {
        Ok(Self::with_runner(Rc::new(TaskRunner::new(config)?)))
    }

    /// Creates a host on an existing runner.
    pub fn with_runner(runner: Rc<TaskRunner>) -> Self {
        Self { runner }
    }

    /// The runner callbacks are dispatched from.
    pub fn runner(&self) -> &Rc<TaskRunner> {
        &self.runner
    }

    /// Wraps an image for script access.
    pub fn image(&self, image: Image) -> ImageObject {
        ImageObject {
            image,
            runner: Rc::clone(&self.runner),
        }
    }

    /// Dispatches callbacks of finished tasks without blocking.
    pub fn poll(&self) -> usize {
        self.runner.poll()
    }

    /// Runs the event loop until no task is outstanding.
    pub fn run(&self) -> usize {
        self.runner.run()
    }
}

/// Script-facing image.
#[derive(Debug, Clone)]
pub struct ImageObject {
    image: Image,
    runner: Rc<TaskRunner>,
}

impl ImageObject {
    /// Underlying image.
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Image width.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `view(x, y, w, h)`.
    ///
    /// # Errors
    ///
    /// - [`HostError::InvalidArgument`] unless given four non-negative
    ///   integers
    /// - [`HostError::InvalidRegion`] if the region leaves the image
    pub fn view(&self, args: &[Value]) -> HostResult<ImageViewObject> {
        const USAGE: &str = "requires 4 integer arguments: x, y, width, and height";
        if args.len() != 4 {
            return Err(HostError::arg(USAGE));
        }
        let mut dims = [0u32; 4];
        for (dim, arg) in dims.iter_mut().zip(args) {
            *dim = arg
                .as_integer()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| HostError::arg(USAGE))?;
        }
        let [x, y, w, h] = dims;
        let view = ImageView::new(&self.image, Rect::new(x, y, w, h))?;
        debug!(region = %view.region(), "view created");
        Ok(ImageViewObject::new(Arc::new(view), Rc::clone(&self.runner)))
    }
}
