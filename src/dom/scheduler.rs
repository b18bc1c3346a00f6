use gloo_timers::callback::{Interval, Timeout};
use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::schedule::{ScheduledWork, Scheduler};

/// Timers from gloo-timers and frames from `requestAnimationFrame`.
pub struct BrowserScheduler {
    window: Window,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        BrowserScheduler { window }
    }
}

impl Scheduler for BrowserScheduler {
    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>) -> ScheduledWork {
        let interval = Interval::new(period_ms, task);
        ScheduledWork::new(move || drop(interval))
    }

    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledWork {
        let timeout = Timeout::new(delay_ms, task);
        ScheduledWork::new(move || drop(timeout))
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) -> ScheduledWork {
        let closure = Closure::once(move |_timestamp: f64| task());
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(id) => {
                let window = self.window.clone();
                ScheduledWork::new(move || {
                    window.cancel_animation_frame(id).ok();
                    drop(closure);
                })
            }
            Err(err) => {
                warn!("requestAnimationFrame failed: {:?}", err);
                ScheduledWork::none()
            }
        }
    }
}
