// Fake collaborators for driving the controller under a virtual clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::bounce::Size;
use crate::config::CoverConfig;
use crate::controller::BreakController;
use crate::cover::{Alignment, CoverSurface};
use crate::error::CoverError;
use crate::player::{MediaSurface, PlayerHandle};
use crate::schedule::{ManualScheduler, Scheduler};
use crate::scoreboard::ScoreOverlay;

#[derive(Debug, Default)]
pub struct PlayerLog {
    pub mute_calls: Vec<bool>,
}

struct FakeSurface {
    log: Rc<RefCell<PlayerLog>>,
}

impl MediaSurface for FakeSurface {
    fn set_muted(&self, muted: bool) {
        self.log.borrow_mut().mute_calls.push(muted);
    }
}

pub struct FakePlayer {
    pub present: Rc<Cell<bool>>,
    pub log: Rc<RefCell<PlayerLog>>,
}

impl PlayerHandle for FakePlayer {
    fn locate(&self) -> Option<Box<dyn MediaSurface>> {
        if !self.present.get() {
            return None;
        }
        Some(Box::new(FakeSurface {
            log: self.log.clone(),
        }))
    }
}

#[derive(Debug, Default)]
pub struct CoverRecord {
    pub attached: bool,
    pub visible: bool,
    pub alignment: Alignment,
    pub text: String,
    pub color: String,
    pub position: (f64, f64),
    pub positions: usize,
    pub out_of_bounds: usize,
}

pub struct FakeCover {
    pub record: Rc<RefCell<CoverRecord>>,
    /// Whether the player container is mounted and can take the cover.
    pub attachable: Rc<Cell<bool>>,
    player: Size,
    label: Size,
    shrink_percent: u8,
}

impl CoverSurface for FakeCover {
    fn ensure_attached(&mut self) -> Result<(), CoverError> {
        let mut record = self.record.borrow_mut();
        if !record.attached {
            if !self.attachable.get() {
                return Err(CoverError::NotAttached);
            }
            record.attached = true;
        }
        Ok(())
    }

    fn show(&mut self) {
        self.record.borrow_mut().visible = true;
    }

    fn hide(&mut self) {
        self.record.borrow_mut().visible = false;
    }

    fn is_visible(&self) -> bool {
        self.record.borrow().visible
    }

    fn set_alignment(&mut self, alignment: Alignment) {
        self.record.borrow_mut().alignment = alignment;
    }

    fn bounds(&self) -> Size {
        let geometry = self.record.borrow().alignment.geometry(self.shrink_percent);
        Size::new(
            self.player.width * f64::from(geometry.width_percent) / 100.0,
            self.player.height,
        )
    }

    fn label_size(&self) -> Size {
        self.label
    }

    fn set_label_text(&mut self, text: &str) {
        self.record.borrow_mut().text = text.to_string();
    }

    fn set_label_color(&mut self, color: &str) {
        self.record.borrow_mut().color = color.to_string();
    }

    fn set_label_position(&mut self, x: f64, y: f64) {
        let bounds = self.bounds();
        let mut record = self.record.borrow_mut();
        record.position = (x, y);
        record.positions += 1;
        let max_x = bounds.width - self.label.width + 1e-9;
        let max_y = bounds.height - self.label.height + 1e-9;
        if !(0.0..=max_x).contains(&x) || !(0.0..=max_y).contains(&y) {
            record.out_of_bounds += 1;
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeScores {
    pub shown: Rc<Cell<bool>>,
    pub shows: Rc<Cell<u32>>,
}

impl ScoreOverlay for FakeScores {
    fn show(&mut self) {
        self.shown.set(true);
        self.shows.set(self.shows.get() + 1);
    }

    fn hide(&mut self) {
        self.shown.set(false);
    }

    fn is_shown(&self) -> bool {
        self.shown.get()
    }
}

/// A controller wired to fakes, with handles to everything it touches.
pub struct Rig {
    pub controller: BreakController,
    pub clock: Rc<ManualScheduler>,
    pub player: Rc<RefCell<PlayerLog>>,
    pub present: Rc<Cell<bool>>,
    pub attachable: Rc<Cell<bool>>,
    pub cover: Rc<RefCell<CoverRecord>>,
}

impl Rig {
    pub fn new() -> Self {
        Rig::with_config(&CoverConfig::default())
    }

    pub fn with_config(config: &CoverConfig) -> Self {
        let clock = Rc::new(ManualScheduler::default());
        let player = Rc::new(RefCell::new(PlayerLog::default()));
        let present = Rc::new(Cell::new(true));
        let attachable = Rc::new(Cell::new(true));
        let cover = Rc::new(RefCell::new(CoverRecord::default()));

        let controller = BreakController::new(
            config,
            Box::new(FakePlayer {
                present: present.clone(),
                log: player.clone(),
            }),
            Box::new(FakeCover {
                record: cover.clone(),
                attachable: attachable.clone(),
                player: Size::new(1000.0, 500.0),
                label: Size::new(200.0, 100.0),
                shrink_percent: config.appearance.shrink_percent,
            }),
            clock.clone() as Rc<dyn Scheduler>,
            fastrand::Rng::with_seed(42),
        );

        Rig {
            controller,
            clock,
            player,
            present,
            attachable,
            cover,
        }
    }

    /// Rig for a page whose player has not been mounted yet.
    pub fn without_player() -> Self {
        let rig = Rig::new();
        rig.present.set(false);
        rig.attachable.set(false);
        rig
    }

    pub fn muted(&self) -> bool {
        self.player
            .borrow()
            .mute_calls
            .last()
            .copied()
            .unwrap_or(false)
    }
}
