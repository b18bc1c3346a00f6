use std::cell::RefCell;

use log::debug;

use crate::config::CoverConfig;
use crate::controller::BreakController;
use crate::cover::Side;
use crate::scoreboard::ScoreOverlay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// End the active break, or start one of this many seconds.
    ToggleBreak(u32),
    ExtendOrStart(u32),
    ToggleAlignment(Side),
    ToggleScores,
}

impl KeyCommand {
    pub fn resolve(config: &CoverConfig, key: &str) -> Option<KeyCommand> {
        let keys = &config.keys;
        let breaks = &config.breaks;
        let command = if key == keys.short_break {
            KeyCommand::ToggleBreak(breaks.short_secs)
        } else if key == keys.long_break {
            KeyCommand::ToggleBreak(breaks.long_secs)
        } else if key == keys.extend {
            KeyCommand::ExtendOrStart(breaks.extend_secs)
        } else if key == keys.shrink_right {
            KeyCommand::ToggleAlignment(Side::Left)
        } else if key == keys.shrink_left {
            KeyCommand::ToggleAlignment(Side::Right)
        } else if key == keys.scores {
            KeyCommand::ToggleScores
        } else {
            return None;
        };
        Some(command)
    }
}

/// Page-wide keyboard handling.
pub struct Hotkeys {
    config: CoverConfig,
    controller: BreakController,
    scores: RefCell<Box<dyn ScoreOverlay>>,
}

impl Hotkeys {
    pub fn new(
        config: CoverConfig,
        controller: BreakController,
        scores: Box<dyn ScoreOverlay>,
    ) -> Self {
        Hotkeys {
            config,
            controller,
            scores: RefCell::new(scores),
        }
    }

    /// Returns whether the key was bound to a command.
    pub fn handle_key(&self, key: &str) -> bool {
        let Some(command) = KeyCommand::resolve(&self.config, key) else {
            return false;
        };
        debug!("key {:?} -> {:?}", key, command);
        self.dispatch(command);
        true
    }

    pub fn dispatch(&self, command: KeyCommand) {
        match command {
            KeyCommand::ToggleBreak(seconds) => {
                if self.controller.is_active() {
                    self.controller.end_break();
                } else {
                    self.controller.start_break(seconds);
                }
            }
            KeyCommand::ExtendOrStart(seconds) => self.controller.extend_or_start(seconds),
            KeyCommand::ToggleAlignment(side) => self.controller.toggle_alignment(side),
            KeyCommand::ToggleScores => self.scores.borrow_mut().toggle(),
        }
    }
}
