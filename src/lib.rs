//! Covers a live TV player during commercial breaks: mutes the video, hides
//! the picture behind a black overlay and bounces a countdown across it.

pub mod app;
pub mod bounce;
pub mod config;
pub mod controller;
pub mod countdown;
pub mod cover;
pub mod dom;
pub mod error;
pub mod hotkeys;
pub mod logging;
pub mod palette;
pub mod player;
pub mod schedule;
pub mod scoreboard;

#[cfg(test)]
mod test_support;

pub use config::CoverConfig;
pub use controller::{BreakController, BreakState};
pub use cover::{Alignment, Side};
pub use error::CoverError;
pub use hotkeys::{Hotkeys, KeyCommand};
