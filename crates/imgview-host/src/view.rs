//! Script-facing image view.
//!
//! Every method validates its arguments before doing any work, so argument
//! errors are always returned synchronously, even from the asynchronous
//! variants. Once a task is queued, failures only reach the callback, as
//! its single argument.
//!
//! | Method | Callback arguments on success |
//! |--------|-------------------------------|
//! | `is_solid(cb)` | `(null, true, value)` or `(null, false)` |
//! | `encode([format], [options], cb)` | `(null, bytes)` |

use crate::{Callback, HostError, HostResult, Value};
use imgview_core::{ImageView, probe};
use imgview_io::{EncodeOptions, Palette, encode_to_file};
use imgview_task::TaskRunner;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

/// Validated encode request.
#[derive(Debug, Clone)]
struct EncodeRequest {
    options: EncodeOptions,
    palette: Option<Arc<Palette>>,
}

impl EncodeRequest {
    /// Parses `[format], [options]`. A format string no encoder accepts
    /// is an argument error.
    fn parse(args: &[Value]) -> HostResult<Self> {
        let mut format = "png";
        let mut palette = None;

        if let Some(arg) = args.first() {
            format = arg
                .as_str()
                .ok_or_else(|| HostError::arg("first arg, 'format' must be a string"))?;
        }
        let options = EncodeOptions::parse(format).map_err(|e| HostError::arg(e.to_string()))?;

        if let Some(options) = args.get(1) {
            if !matches!(options, Value::Object(_)) {
                return Err(HostError::arg("optional second arg must be an options object"));
            }
            match options.get("palette") {
                Value::Undefined => {}
                Value::Palette(p) => palette = Some(Arc::clone(p)),
                _ => return Err(HostError::arg("Palette expected as 'palette' option")),
            }
        }

        Ok(Self { options, palette })
    }

    fn encode(&self, view: &ImageView) -> HostResult<Vec<u8>> {
        Ok(imgview_io::encode(view, &self.options, self.palette.as_deref())?)
    }
}

fn callback_arg(args: &[Value]) -> HostResult<Callback> {
    args.last()
        .and_then(Value::as_function)
        .cloned()
        .ok_or_else(|| HostError::arg("last argument must be a callback function"))
}

/// An [`ImageView`] exposed to scripts.
#[derive(Clone)]
pub struct ImageViewObject {
    view: Arc<ImageView>,
    runner: Rc<TaskRunner>,
}

impl ImageViewObject {
    pub(crate) fn new(view: Arc<ImageView>, runner: Rc<TaskRunner>) -> Self {
        Self { view, runner }
    }

    /// The wrapped view.
    pub fn view(&self) -> &ImageView {
        &self.view
    }

    /// View width.
    pub fn width(&self) -> u32 {
        self.view.width()
    }

    /// View height.
    pub fn height(&self) -> u32 {
        self.view.height()
    }

    /// `getPixel(x, y)`: the pixel value, or `undefined` outside the view.
    pub fn get_pixel(&self, args: &[Value]) -> HostResult<Value> {
        if args.len() < 2 {
            return Err(HostError::arg("must supply x,y to query pixel color"));
        }
        let x = args[0]
            .as_integer()
            .ok_or_else(|| HostError::arg("first arg, 'x' must be an integer"))?;
        let y = args[1]
            .as_integer()
            .ok_or_else(|| HostError::arg("second arg, 'y' must be an integer"))?;
        Ok(self.view.get_pixel(x, y).into())
    }

    /// `isSolidSync()`. Zero-area views are solid.
    pub fn is_solid_sync(&self) -> Value {
        Value::Bool(self.view.is_solid())
    }

    /// `isSolid(callback)`.
    ///
    /// Without arguments this behaves like [`is_solid_sync`](Self::is_solid_sync).
    /// Otherwise the last argument must be a function; it later receives
    /// `(null, true, value)` for a uniform view, `(null, false)` otherwise,
    /// or `(error)` with [`HostError::InvalidDimensions`] for a zero-area view.
    pub fn is_solid(&self, args: &[Value]) -> HostResult<Value> {
        if args.is_empty() {
            return Ok(self.is_solid_sync());
        }
        let callback = callback_arg(args)?;

        let handle = self.runner.submit(
            Arc::clone(&self.view),
            |view: &ImageView| probe(&view.view()).map_err(HostError::from),
            move |result| {
                let args = match result {
                    Ok(s) if s.solid => vec![Value::Null, Value::Bool(true), s.value.into()],
                    Ok(_) => vec![Value::Null, Value::Bool(false)],
                    Err(e) => vec![e.into()],
                };
                callback(args);
            },
        );
        trace!(task = %handle.id(), region = %self.view.region(), "isSolid queued");
        Ok(Value::Undefined)
    }

    /// `encodeSync([format], [options])`: encoded bytes.
    ///
    /// `format` defaults to `"png"`. The only option is `palette`. An
    /// unrecognised format fails with [`HostError::InvalidArgument`].
    pub fn encode_sync(&self, args: &[Value]) -> HostResult<Value> {
        let request = EncodeRequest::parse(args)?;
        Ok(Value::Bytes(request.encode(&self.view)?))
    }

    /// `encode([format], [options], callback)`.
    ///
    /// The callback is always the last argument and receives
    /// `(null, bytes)` or `(error)`.
    pub fn encode(&self, args: &[Value]) -> HostResult<Value> {
        let callback = callback_arg(args)?;
        let request = EncodeRequest::parse(&args[..args.len() - 1])?;
        let options = request.options;

        let handle = self.runner.submit(
            Arc::clone(&self.view),
            move |view: &ImageView| request.encode(view),
            move |result| {
                let args = match result {
                    Ok(bytes) => vec![Value::Null, Value::Bytes(bytes)],
                    Err(e) => vec![e.into()],
                };
                callback(args);
            },
        );
        trace!(task = %handle.id(), options = %options, "encode queued");
        Ok(Value::Undefined)
    }

    /// `save(filename, [format])`.
    ///
    /// Without a format the file extension decides; an unrecognised
    /// extension fails with [`HostError::UnknownFormat`] before anything is
    /// written.
    pub fn save(&self, args: &[Value]) -> HostResult<Value> {
        let path = args
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| HostError::arg("filename required"))?;
        let format = match args.get(1) {
            None => None,
            Some(arg) => Some(arg.as_str().ok_or_else(|| {
                HostError::arg("both 'filename' and 'format' arguments must be strings")
            })?),
        };
        encode_to_file(&self.view, path, format)?;
        debug!(path, format = format.unwrap_or("from extension"), "view saved");
        Ok(Value::Undefined)
    }
}

impl std::fmt::Debug for ImageViewObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageViewObject")
            .field("region", &self.view.region())
            .field("format", &self.view.format())
            .finish()
    }
}
