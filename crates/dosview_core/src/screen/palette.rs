use super::cell::Color;

/// Colors used by the base screen and overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub bar_fg: Color,
    pub bar_bg: Color,
    pub overlay_fg: Color,
    pub overlay_bg: Color,
    pub accent: Color,
}

impl Palette {
    /// White on DOS blue with cyan bars.
    pub fn classic() -> Self {
        Self {
            background: Color::rgb(0x00, 0x00, 0xAA),
            text: Color::rgb(0xAA, 0xAA, 0xAA),
            bar_fg: Color::rgb(0x00, 0x00, 0x00),
            bar_bg: Color::rgb(0x00, 0xAA, 0xAA),
            overlay_fg: Color::rgb(0xFF, 0xFF, 0xFF),
            overlay_bg: Color::rgb(0xAA, 0x00, 0x00),
            accent: Color::rgb(0xFF, 0xFF, 0x55),
        }
    }

    pub fn monochrome() -> Self {
        Self {
            background: Color::rgb(0x00, 0x00, 0x00),
            text: Color::rgb(0xC0, 0xC0, 0xC0),
            bar_fg: Color::rgb(0x00, 0x00, 0x00),
            bar_bg: Color::rgb(0xC0, 0xC0, 0xC0),
            overlay_fg: Color::rgb(0xFF, 0xFF, 0xFF),
            overlay_bg: Color::rgb(0x40, 0x40, 0x40),
            accent: Color::rgb(0xFF, 0xFF, 0xFF),
        }
    }

    pub fn amber() -> Self {
        Self {
            background: Color::rgb(0x10, 0x08, 0x00),
            text: Color::rgb(0xFF, 0xB0, 0x00),
            bar_fg: Color::rgb(0x10, 0x08, 0x00),
            bar_bg: Color::rgb(0xFF, 0xB0, 0x00),
            overlay_fg: Color::rgb(0xFF, 0xD0, 0x60),
            overlay_bg: Color::rgb(0x40, 0x20, 0x00),
            accent: Color::rgb(0xFF, 0xE0, 0xA0),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "classic" => Some(Self::classic()),
            "monochrome" | "mono" => Some(Self::monochrome()),
            "amber" => Some(Self::amber()),
            _ => None,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic()
    }
}
