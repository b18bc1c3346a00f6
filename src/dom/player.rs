use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlMediaElement};

use crate::config::PlayerConfig;
use crate::player::{MediaSurface, PlayerHandle};

struct DomMedia(HtmlMediaElement);

impl MediaSurface for DomMedia {
    fn set_muted(&self, muted: bool) {
        self.0.set_muted(muted);
    }
}

/// Finds the player's `<video>` by selector on every lookup.
pub struct DomPlayer {
    document: Document,
    video_selector: String,
}

impl DomPlayer {
    pub fn new(document: Document, config: &PlayerConfig) -> Self {
        DomPlayer {
            document,
            video_selector: config.video_selector.clone(),
        }
    }
}

impl PlayerHandle for DomPlayer {
    fn locate(&self) -> Option<Box<dyn MediaSurface>> {
        let element = self
            .document
            .query_selector(&self.video_selector)
            .ok()
            .flatten()?;
        let media = element.dyn_into::<HtmlMediaElement>().ok()?;
        Some(Box::new(DomMedia(media)))
    }
}
