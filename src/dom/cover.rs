use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::bounce::Size;
use crate::config::CoverConfig;
use crate::cover::{Alignment, CoverSurface};
use crate::error::CoverError;

pub const LABEL_ID: &str = "commercial-cover-timer";

/// Black `<div>` over the player with an absolutely positioned countdown `<span>`.
pub struct DomCover {
    document: Document,
    cover: HtmlElement,
    label: HtmlElement,
    player_selector: String,
    shrink_percent: u8,
    visible: bool,
}

fn create_html_element(document: &Document, tag: &str) -> Result<HtmlElement, CoverError> {
    document
        .create_element(tag)
        .map_err(CoverError::dom)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| CoverError::Dom(format!("<{}> is not an HtmlElement", tag)))
}

fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) -> Result<(), CoverError> {
    let style = element.style();
    for (property, value) in styles {
        style.set_property(property, value).map_err(CoverError::dom)?;
    }
    Ok(())
}

impl DomCover {
    /// Builds the hidden cover. It is attached to the player later, once the
    /// player exists.
    pub fn create(document: &Document, config: &CoverConfig) -> Result<Self, CoverError> {
        let cover = create_html_element(document, "div")?;
        set_styles(
            &cover,
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("width", "100%"),
                ("height", "100%"),
                ("background-color", "black"),
                ("z-index", "1000"),
                ("display", "none"),
            ],
        )?;

        // Color fades between palette steps; position is driven per frame.
        let transition = document.create_element("style").map_err(CoverError::dom)?;
        transition.set_text_content(Some(&format!(
            "#{} {{ transition: color 0.5s ease-in-out; }}",
            LABEL_ID
        )));
        if let Some(head) = document.head() {
            head.append_child(&transition).map_err(CoverError::dom)?;
        }

        let label = create_html_element(document, "span")?;
        label.set_id(LABEL_ID);
        let first_color = config
            .appearance
            .palette
            .first()
            .map(String::as_str)
            .unwrap_or("white");
        set_styles(
            &label,
            &[
                ("color", first_color),
                ("font-size", config.appearance.label_font_size.as_str()),
                ("font-family", "Arial, sans-serif"),
                ("position", "absolute"),
                ("z-index", "1001"),
            ],
        )?;
        cover.append_child(&label).map_err(CoverError::dom)?;

        Ok(DomCover {
            document: document.clone(),
            cover,
            label,
            player_selector: config.player.player_selector.clone(),
            shrink_percent: config.appearance.shrink_percent,
            visible: false,
        })
    }

    fn style(&self, element: &HtmlElement, property: &str, value: &str) {
        if let Err(err) = element.style().set_property(property, value) {
            warn!("failed to set {}: {:?}", property, err);
        }
    }
}

impl CoverSurface for DomCover {
    fn ensure_attached(&mut self) -> Result<(), CoverError> {
        if self.cover.parent_element().is_some() {
            return Ok(());
        }
        let player = self
            .document
            .query_selector(&self.player_selector)
            .map_err(CoverError::dom)?
            .ok_or(CoverError::NotAttached)?;
        player.append_child(&self.cover).map_err(CoverError::dom)?;
        debug!("cover attached to {}", self.player_selector);
        Ok(())
    }

    fn show(&mut self) {
        self.style(&self.cover, "display", "block");
        self.visible = true;
    }

    fn hide(&mut self) {
        self.style(&self.cover, "display", "none");
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_alignment(&mut self, alignment: Alignment) {
        let geometry = alignment.geometry(self.shrink_percent);
        self.style(&self.cover, "width", &geometry.width_css());
        self.style(&self.cover, "left", &geometry.left_css());
    }

    fn bounds(&self) -> Size {
        let rect = self.cover.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn label_size(&self) -> Size {
        let rect = self.label.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn set_label_text(&mut self, text: &str) {
        self.label.set_text_content(Some(text));
    }

    fn set_label_color(&mut self, color: &str) {
        self.style(&self.label, "color", color);
    }

    fn set_label_position(&mut self, x: f64, y: f64) {
        self.style(&self.label, "left", &format!("{}px", x));
        self.style(&self.label, "top", &format!("{}px", y));
    }
}
