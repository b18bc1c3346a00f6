use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Document, Element, Window};

use crate::error::CoverError;

// Each `:not(#id)` adds id-level specificity so the rule beats page styles
// that set their own cursor.
const SPECIFICITY_PADDING: usize = 16;

const HIDE_EVENTS: [&str; 2] = ["scroll", "keydown"];
const POINTER_EVENTS: [&str; 2] = ["pointerdown", "pointermove"];
const LEGACY_POINTER_EVENTS: [&str; 4] = ["mousedown", "mousemove", "touchstart", "touchmove"];

pub fn hide_cursor_css(padding: usize) -> String {
    let selector: String = (0..padding)
        .map(|i| format!(":not(#commercial-cover-cursor-{})", i))
        .collect();
    format!("{} {{cursor: none !important}}", selector)
}

/// Hides the mouse pointer while the viewer is using the keyboard and brings
/// it back on any pointer movement.
pub struct CursorHider {
    document: Document,
    style: Element,
    hidden: Cell<bool>,
}

impl CursorHider {
    pub fn install(window: &Window, document: &Document) -> Result<Rc<Self>, CoverError> {
        let style = document.create_element("style").map_err(CoverError::dom)?;
        style.set_text_content(Some(&hide_cursor_css(SPECIFICITY_PADDING)));

        let hider = Rc::new(CursorHider {
            document: document.clone(),
            style,
            hidden: Cell::new(false),
        });

        let options = AddEventListenerOptions::new();
        options.set_capture(true);
        options.set_passive(true);

        for event in HIDE_EVENTS {
            let target = hider.clone();
            hider.listen(event, &options, move || target.hide())?;
        }

        let supports_pointer =
            js_sys::Reflect::has(window, &JsValue::from_str("PointerEvent")).unwrap_or(false);
        let show_events: &[&str] = if supports_pointer {
            &POINTER_EVENTS
        } else {
            &LEGACY_POINTER_EVENTS
        };
        for event in show_events {
            let target = hider.clone();
            hider.listen(event, &options, move || target.show())?;
        }

        Ok(hider)
    }

    fn listen(
        &self,
        event: &str,
        options: &AddEventListenerOptions,
        handler: impl Fn() + 'static,
    ) -> Result<(), CoverError> {
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| handler())
            as Box<dyn Fn(web_sys::Event)>);
        self.document
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                options,
            )
            .map_err(CoverError::dom)?;
        closure.forget();
        Ok(())
    }

    pub fn hide(&self) {
        if self.hidden.replace(true) {
            return;
        }
        if let Some(head) = self.document.head() {
            head.append_child(&self.style).ok();
        }
    }

    pub fn show(&self) {
        if !self.hidden.replace(false) {
            return;
        }
        self.style.remove();
    }
}
