/// RGB color with an alpha multiplier in `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub rgb: [u8; 3],
    pub alpha: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { rgb: [r, g, b], alpha: 1.0 }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha: alpha.clamp(0.0, 1.0), ..self }
    }

    /// Multiplies the current alpha by `opacity`.
    pub fn faded(self, opacity: f32) -> Self {
        self.with_alpha(self.alpha * opacity.clamp(0.0, 1.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenCell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl ScreenCell {
    pub const BLANK: Self = Self { ch: ' ', fg: None, bg: None };

    pub fn new(ch: char) -> Self {
        Self { ch, fg: None, bg: None }
    }

    pub fn colored(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg: Some(fg), bg: Some(bg) }
    }

    pub fn is_blank(&self) -> bool {
        self.ch == ' ' || self.ch == '\0'
    }

    /// Whether this cell replaces what is beneath it when composited.
    pub fn is_opaque(&self) -> bool {
        !self.is_blank() || self.bg.is_some()
    }

    pub fn inverted(self) -> Self {
        Self { ch: self.ch, fg: self.bg, bg: self.fg }
    }

    pub fn faded(self, opacity: f32) -> Self {
        Self {
            ch: self.ch,
            fg: self.fg.map(|color| color.faded(opacity)),
            bg: self.bg.map(|color| color.faded(opacity)),
        }
    }
}

impl Default for ScreenCell {
    fn default() -> Self {
        Self::BLANK
    }
}
