/// Steps the label through a fixed list of colors so no pixel stays lit
/// with the same value for the whole break.
#[derive(Debug, Clone)]
pub struct ColorCycler {
    palette: Vec<String>,
    index: usize,
}

impl ColorCycler {
    /// `palette` must be non-empty; `CoverConfig::validate` guarantees it.
    pub fn new(palette: Vec<String>) -> Self {
        ColorCycler { palette, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &str {
        self.palette
            .get(self.index)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn advance(&mut self) -> &str {
        if !self.palette.is_empty() {
            self.index = (self.index + 1) % self.palette.len();
        }
        self.current()
    }

    pub fn reset(&mut self) -> &str {
        self.index = 0;
        self.current()
    }
}
