use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, warn};
use web_sys::{Document, Element};
use yew::{AppHandle, Callback};

use crate::config::CoverConfig;
use crate::error::CoverError;
use crate::scoreboard::view::{ScoreboardProps, ScoreboardView};
use crate::scoreboard::ScoreOverlay;

struct Mounted {
    host: Element,
    app: AppHandle<ScoreboardView>,
}

type Slot = RefCell<Option<Mounted>>;

fn unmount(slot: &Slot) {
    let mounted = slot.borrow_mut().take();
    if let Some(Mounted { host, app }) = mounted {
        app.destroy();
        host.remove();
    }
}

/// Renders the scoreboard into a fresh element inside the player each time
/// it is shown, and tears it down on hide.
pub struct DomScoreOverlay {
    document: Document,
    player_selector: String,
    url: String,
    time_zone: String,
    mounted: Rc<Slot>,
}

impl DomScoreOverlay {
    pub fn new(document: Document, config: &CoverConfig) -> Self {
        DomScoreOverlay {
            document,
            player_selector: config.player.player_selector.clone(),
            url: config.scoreboard.url.clone(),
            time_zone: config.scoreboard.time_zone.clone(),
            mounted: Rc::new(RefCell::new(None)),
        }
    }

    fn mount(&self) -> Result<(), CoverError> {
        let player = self
            .document
            .query_selector(&self.player_selector)
            .map_err(CoverError::dom)?
            .ok_or(CoverError::PlayerUnavailable)?;

        let host = self.document.create_element("div").map_err(CoverError::dom)?;
        host.set_class_name("score-overlay-host");
        host.set_attribute("style", "position:absolute; inset:0; z-index:1002;")
            .map_err(CoverError::dom)?;
        player.append_child(&host).map_err(CoverError::dom)?;

        // Closing from inside the app must wait until its event handler returns.
        let slot: Weak<Slot> = Rc::downgrade(&self.mounted);
        let on_close = Callback::from(move |_: ()| {
            let slot = slot.clone();
            wasm_bindgen_futures::spawn_local(async move {
                if let Some(slot) = slot.upgrade() {
                    unmount(&slot);
                }
            });
        });

        let props = ScoreboardProps {
            url: self.url.clone().into(),
            time_zone: self.time_zone.clone().into(),
            on_close,
        };
        let app = yew::Renderer::<ScoreboardView>::with_root_and_props(host.clone(), props).render();
        *self.mounted.borrow_mut() = Some(Mounted { host, app });
        Ok(())
    }
}

impl ScoreOverlay for DomScoreOverlay {
    fn show(&mut self) {
        if self.is_shown() {
            return;
        }
        match self.mount() {
            Ok(()) => debug!("score overlay shown"),
            Err(CoverError::PlayerUnavailable) => debug!("no player, score overlay not shown"),
            Err(err) => warn!("score overlay failed: {}", err),
        }
    }

    fn hide(&mut self) {
        unmount(&self.mounted);
    }

    fn is_shown(&self) -> bool {
        self.mounted.borrow().is_some()
    }
}
