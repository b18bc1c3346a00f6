//! Live score overlay, toggled independently of commercial breaks.

pub mod model;
pub mod overlay;
pub mod view;

pub use model::{GameCard, Scoreboard};
pub use overlay::DomScoreOverlay;

/// Show/hide contract the hotkeys rely on.
pub trait ScoreOverlay {
    fn show(&mut self);
    fn hide(&mut self);
    fn is_shown(&self) -> bool;

    fn toggle(&mut self) {
        if self.is_shown() {
            self.hide();
        } else {
            self.show();
        }
    }
}
