use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

/// Handle to a timer, interval or animation frame.
///
/// Dropping the handle cancels the work; cancelling work that already ran
/// does nothing.
#[must_use = "dropping a ScheduledWork cancels it"]
pub struct ScheduledWork {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ScheduledWork {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        ScheduledWork {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Work that was never scheduled, e.g. when the browser refused a frame.
    pub fn none() -> Self {
        ScheduledWork { cancel: None }
    }

    pub fn cancel(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for ScheduledWork {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for ScheduledWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledWork")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Source of timers and animation frames for the break controller.
pub trait Scheduler {
    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>) -> ScheduledWork;
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledWork;
    fn next_frame(&self, task: Box<dyn FnOnce()>) -> ScheduledWork;
}

/// The four activities that run while a break is active.
#[derive(Debug, Default)]
pub struct Activities {
    pub countdown: Option<ScheduledWork>,
    pub color: Option<ScheduledWork>,
    pub frame: Option<ScheduledWork>,
    pub deadline: Option<ScheduledWork>,
}

impl Activities {
    pub fn cancel_all(&mut self) {
        for slot in [
            &mut self.countdown,
            &mut self.color,
            &mut self.frame,
            &mut self.deadline,
        ] {
            cancel_if_present(slot);
        }
    }

    pub fn is_idle(&self) -> bool {
        self.countdown.is_none()
            && self.color.is_none()
            && self.frame.is_none()
            && self.deadline.is_none()
    }
}

pub fn cancel_if_present(slot: &mut Option<ScheduledWork>) {
    if let Some(work) = slot.take() {
        work.cancel();
    }
}

pub const DEFAULT_FRAME_MS: u32 = 16;

enum Task {
    Once(Box<dyn FnOnce()>),
    Repeat { period: u32, run: Box<dyn FnMut()> },
}

struct Pending {
    due: u64,
    task: Task,
}

#[derive(Default)]
struct ClockState {
    now: u64,
    next_id: u64,
    queue: BTreeMap<u64, Pending>,
    running: Option<u64>,
    running_cancelled: bool,
}

/// Deterministic virtual-time scheduler.
///
/// Nothing runs until `advance` is called. Due work runs in order of due
/// time, then registration order; animation frames are timers of
/// `frame_ms`.
pub struct ManualScheduler {
    state: Rc<RefCell<ClockState>>,
    frame_ms: u32,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        ManualScheduler::new(DEFAULT_FRAME_MS)
    }
}

impl ManualScheduler {
    pub fn new(frame_ms: u32) -> Self {
        ManualScheduler {
            state: Rc::new(RefCell::new(ClockState::default())),
            frame_ms: frame_ms.max(1),
        }
    }

    #[cfg(test)]
    pub fn now_ms(&self) -> u64 {
        self.state.borrow().now
    }

    /// Number of timers and frames still waiting to run.
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Runs everything due within the next `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        let target = self.state.borrow().now + ms;

        loop {
            let next = {
                let state = self.state.borrow();
                state
                    .queue
                    .iter()
                    .filter(|(_, pending)| pending.due <= target)
                    .min_by_key(|(id, pending)| (pending.due, **id))
                    .map(|(id, _)| *id)
            };
            let Some(id) = next else {
                break;
            };

            let pending = {
                let mut state = self.state.borrow_mut();
                let Some(pending) = state.queue.remove(&id) else {
                    continue;
                };
                state.now = pending.due;
                state.running = Some(id);
                state.running_cancelled = false;
                pending
            };

            match pending.task {
                Task::Once(run) => {
                    run();
                    self.state.borrow_mut().running = None;
                }
                Task::Repeat { period, mut run } => {
                    run();
                    let mut state = self.state.borrow_mut();
                    state.running = None;
                    if !state.running_cancelled {
                        state.queue.insert(
                            id,
                            Pending {
                                due: pending.due + u64::from(period),
                                task: Task::Repeat { period, run },
                            },
                        );
                    }
                }
            }
        }

        self.state.borrow_mut().now = target;
    }

    fn schedule(&self, delay_ms: u32, task: Task) -> ScheduledWork {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            let due = state.now + u64::from(delay_ms);
            state.queue.insert(id, Pending { due, task });
            id
        };

        let weak: Weak<RefCell<ClockState>> = Rc::downgrade(&self.state);
        ScheduledWork::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let removed = {
                let mut state = state.borrow_mut();
                let removed = state.queue.remove(&id);
                if removed.is_none() && state.running == Some(id) {
                    state.running_cancelled = true;
                }
                removed
            };
            drop(removed);
        })
    }
}

impl Scheduler for ManualScheduler {
    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>) -> ScheduledWork {
        let period = period_ms.max(1);
        self.schedule(period, Task::Repeat { period, run: task })
    }

    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ScheduledWork {
        self.schedule(delay_ms, Task::Once(task))
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) -> ScheduledWork {
        self.schedule(self.frame_ms, Task::Once(task))
    }
}
