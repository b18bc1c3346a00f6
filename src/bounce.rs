// Screensaver-style motion for the countdown label.

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

/// Position and per-frame velocity of the label inside the cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationCursor {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

/// Which axes reflected during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reflection {
    pub horizontal: bool,
    pub vertical: bool,
}

#[derive(Debug, Clone)]
pub struct BounceAnimator {
    cursor: AnimationCursor,
    speed: f64,
}

impl BounceAnimator {
    pub fn new(speed: f64) -> Self {
        BounceAnimator {
            cursor: AnimationCursor {
                x: 0.0,
                y: 0.0,
                dx: speed,
                dy: speed,
            },
            speed,
        }
    }

    pub fn cursor(&self) -> AnimationCursor {
        self.cursor
    }

    pub fn position(&self) -> (f64, f64) {
        (self.cursor.x, self.cursor.y)
    }

    /// Picks a fresh in-bounds position and random direction signs.
    /// Call whenever the cover bounds change.
    pub fn randomize_start(&mut self, bounds: Size, label: Size, rng: &mut fastrand::Rng) {
        let max_x = (bounds.width - label.width).max(0.0);
        let max_y = (bounds.height - label.height).max(0.0);

        self.cursor = AnimationCursor {
            x: rng.f64() * max_x,
            y: rng.f64() * max_y,
            dx: if rng.bool() { -self.speed } else { self.speed },
            dy: if rng.bool() { -self.speed } else { self.speed },
        };
    }

    /// Advances one frame, reflecting off any edge crossed.
    pub fn step(&mut self, bounds: Size, label: Size) -> Reflection {
        let (x, dx, horizontal) =
            advance_axis(self.cursor.x, self.cursor.dx, bounds.width, label.width);
        let (y, dy, vertical) =
            advance_axis(self.cursor.y, self.cursor.dy, bounds.height, label.height);
        self.cursor = AnimationCursor { x, y, dx, dy };
        Reflection {
            horizontal,
            vertical,
        }
    }
}

fn advance_axis(pos: f64, velocity: f64, bound: f64, extent: f64) -> (f64, f64, bool) {
    let next = pos + velocity;
    if next + extent > bound || next < 0.0 {
        // min before max: a label larger than the cover pins to 0.
        let clamped = next.min(bound - extent).max(0.0);
        (clamped, -velocity, true)
    } else {
        (next, velocity, false)
    }
}
