use std::rc::Rc;

use log::{info, LevelFilter};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

use crate::config::CoverConfig;
use crate::controller::BreakController;
use crate::dom::{self, BrowserScheduler, CursorHider, DomCover, DomPlayer};
use crate::error::CoverError;
use crate::hotkeys::Hotkeys;
use crate::logging;
use crate::scoreboard::DomScoreOverlay;

#[wasm_bindgen(inline_js = r#"
export function observeMutations(target, callback) {
    const observer = new MutationObserver(() => callback());
    observer.observe(target, { childList: true, subtree: true });
    return observer;
}

export function readConfig() {
    return globalThis.commercialCoverConfig ?? null;
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = observeMutations)]
    fn observe_mutations(target: &web_sys::Node, callback: &Closure<dyn Fn()>) -> JsValue;

    #[wasm_bindgen(js_name = readConfig)]
    fn read_config() -> JsValue;
}

fn load_config() -> Result<CoverConfig, CoverError> {
    let raw = read_config();
    if raw.is_null() || raw.is_undefined() {
        return Ok(CoverConfig::default());
    }
    Ok(serde_wasm_bindgen::from_value(raw)?)
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Wires the controller, hotkeys and score overlay into the current page.
pub fn install() -> Result<(), CoverError> {
    let config = load_config()?;
    logging::init(config.log_level.filter().unwrap_or(LevelFilter::Info));
    config.validate()?;

    let window = dom::window()?;
    let document = dom::document(&window)?;

    let controller = BreakController::new(
        &config,
        Box::new(DomPlayer::new(document.clone(), &config.player)),
        Box::new(DomCover::create(&document, &config)?),
        Rc::new(BrowserScheduler::new(window.clone())),
        fastrand::Rng::with_seed(random_seed()),
    );
    let scores = DomScoreOverlay::new(document.clone(), &config);
    let hotkeys = Rc::new(Hotkeys::new(
        config.clone(),
        controller.clone(),
        Box::new(scores),
    ));

    let on_key = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        hotkeys.handle_key(&event.key());
    }) as Box<dyn Fn(KeyboardEvent)>);
    document
        .add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())
        .map_err(CoverError::dom)?;
    on_key.forget();

    // The player is rebuilt whenever the page swaps channels.
    let body = document
        .body()
        .ok_or_else(|| CoverError::Dom("document has no body".to_string()))?;
    let watched = controller.clone();
    let on_mutation = Closure::wrap(Box::new(move || watched.sync_player()) as Box<dyn Fn()>);
    observe_mutations(&body, &on_mutation);
    on_mutation.forget();

    // Lives as long as its listeners, which are never removed.
    let _cursor = CursorHider::install(&window, &document)?;

    controller.sync_player();
    info!(
        "commercial cover ready: {} short, {} long, {} extend",
        config.keys.short_break, config.keys.long_break, config.keys.extend
    );
    Ok(())
}
