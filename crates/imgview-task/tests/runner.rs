//! Runner behaviour with image views as task holds.

use imgview_core::{Color, Error, Image, ImageView, PixelValue, Solidity, probe};
use imgview_task::{RunnerConfig, TaskError, TaskRunner, TaskState};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

#[derive(Debug)]
enum ProbeError {
    Core(Error),
    Task(TaskError),
}

impl From<TaskError> for ProbeError {
    fn from(e: TaskError) -> Self {
        ProbeError::Task(e)
    }
}

fn probe_view(view: &ImageView) -> Result<Solidity, ProbeError> {
    probe(&view.view()).map_err(ProbeError::Core)
}

fn runner() -> TaskRunner {
    TaskRunner::new(&RunnerConfig::new().with_threads(2)).unwrap()
}

#[test]
fn view_keeps_image_alive_until_callback_returns() {
    let runner = runner();
    let image = Image::filled(64, 64, Color::rgb(255, 0, 0));
    let weak = image.downgrade();
    let view = Arc::new(image.view(8, 8, 32, 32).unwrap());
    drop(image);

    let alive_in_callback = Rc::new(RefCell::new(None));
    let seen = alive_in_callback.clone();
    let probe_weak = weak.clone();
    runner.submit(view, probe_view, move |r| {
        let solidity = r.unwrap();
        *seen.borrow_mut() = Some((solidity.solid, !probe_weak.is_released()));
    });

    runner.run();
    assert_eq!(*alive_in_callback.borrow(), Some((true, true)));
    assert!(weak.is_released());
}

#[test]
fn solid_result_carries_first_pixel() {
    let runner = runner();
    let red = Color::rgb(255, 0, 0);
    let image = Image::filled(10, 10, red);
    let view = Arc::new(image.view(0, 0, 10, 10).unwrap());
    let expected = view.get_pixel(0, 0);

    let got = Rc::new(RefCell::new(None));
    let out = got.clone();
    let handle = runner.submit(view, probe_view, move |r| *out.borrow_mut() = Some(r.unwrap()));
    runner.run();

    assert_eq!(handle.state(), TaskState::Completed);
    let solidity = got.borrow_mut().take().unwrap();
    assert!(solidity.solid);
    assert_eq!(solidity.value, expected);
    assert_eq!(solidity.value, Some(PixelValue::Color(red)));
}

#[test]
fn zero_area_view_reports_error_through_callback() {
    let runner = runner();
    let image = Image::filled(10, 10, Color::rgb(255, 0, 0));
    let view = Arc::new(image.view(3, 3, 0, 0).unwrap());
    assert!(view.is_solid());

    let got = Rc::new(RefCell::new(None));
    let out = got.clone();
    runner.submit(view, probe_view, move |r| *out.borrow_mut() = Some(r));
    runner.run();

    match got.borrow_mut().take() {
        Some(Err(ProbeError::Core(Error::InvalidDimensions { .. }))) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn many_tasks_each_complete_once() {
    let runner = runner();
    let image = Image::filled(32, 32, Color::rgb(0, 128, 0));
    let count = Rc::new(RefCell::new(0));
    for tile in image.bounds().tiles(8, 8) {
        let view = Arc::new(ImageView::new(&image, tile).unwrap());
        let count = count.clone();
        runner.submit(view, probe_view, move |r| {
            assert!(r.unwrap().solid);
            *count.borrow_mut() += 1;
        });
    }
    assert_eq!(runner.pending(), 16);
    assert_eq!(runner.run(), 16);
    assert_eq!(*count.borrow(), 16);
    assert_eq!(runner.pending(), 0);
}
