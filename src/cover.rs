use crate::bounce::Size;
use crate::error::CoverError;

/// Portion of the player width the cover occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Full,
    /// Shrunk and anchored to the player's left edge.
    LeftShrunk,
    /// Shrunk and anchored to the player's right edge.
    RightShrunk,
}

/// Direction of a shrink request, named after the arrow key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// ArrowLeft pushes the cover to the right edge and vice versa.
    pub fn target(self) -> Alignment {
        match self {
            Side::Left => Alignment::RightShrunk,
            Side::Right => Alignment::LeftShrunk,
        }
    }
}

impl Alignment {
    /// Pressing the same side twice restores full width; the other side
    /// switches directly between the two shrunk states.
    pub fn toggled(self, side: Side) -> Alignment {
        let target = side.target();
        if self == target {
            Alignment::Full
        } else {
            target
        }
    }

    pub fn geometry(self, shrink_percent: u8) -> CoverGeometry {
        let shrink = shrink_percent.min(100);
        match self {
            Alignment::Full => CoverGeometry {
                width_percent: 100,
                left_percent: 0,
            },
            Alignment::LeftShrunk => CoverGeometry {
                width_percent: shrink,
                left_percent: 0,
            },
            Alignment::RightShrunk => CoverGeometry {
                width_percent: shrink,
                left_percent: 100 - shrink,
            },
        }
    }
}

/// Cover placement as percentages of the player box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverGeometry {
    pub width_percent: u8,
    pub left_percent: u8,
}

impl CoverGeometry {
    pub fn width_css(&self) -> String {
        format!("{}%", self.width_percent)
    }

    pub fn left_css(&self) -> String {
        if self.left_percent == 0 {
            "0".to_string()
        } else {
            format!("{}%", self.left_percent)
        }
    }
}

/// The opaque region laid over the player, plus its countdown label.
///
/// A single instance is created at startup and reused for every break.
pub trait CoverSurface {
    /// Attaches to the player container if the cover is not attached yet.
    /// Fails with `NotAttached` while the player container does not exist.
    fn ensure_attached(&mut self) -> Result<(), CoverError>;

    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;

    fn set_alignment(&mut self, alignment: Alignment);

    /// Current size of the cover box.
    fn bounds(&self) -> Size;
    /// Current size of the label box.
    fn label_size(&self) -> Size;

    fn set_label_text(&mut self, text: &str);
    fn set_label_color(&mut self, color: &str);
    fn set_label_position(&mut self, x: f64, y: f64);
}
