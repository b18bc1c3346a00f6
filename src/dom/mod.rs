//! Browser implementations of the controller's collaborators.

pub mod cover;
pub mod cursor;
pub mod player;
pub mod scheduler;

pub use cover::DomCover;
pub use cursor::CursorHider;
pub use player::DomPlayer;
pub use scheduler::BrowserScheduler;

use crate::error::CoverError;

pub fn window() -> Result<web_sys::Window, CoverError> {
    web_sys::window().ok_or_else(|| CoverError::Dom("no global window".to_string()))
}

pub fn document(window: &web_sys::Window) -> Result<web_sys::Document, CoverError> {
    window
        .document()
        .ok_or_else(|| CoverError::Dom("window has no document".to_string()))
}
