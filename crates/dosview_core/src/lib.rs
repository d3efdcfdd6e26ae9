mod document;
mod font;
mod input;
mod overlay;
mod screen;
mod settings;
mod viewer;

use std::path::PathBuf;

pub use document::{clean_line, wrap_line, Document, Statistics};
pub use font::{
    bitmap::{FontMetrics, GlyphBitmap},
    codepage::{decode_cp866, resolve_byte, CP866, FALLBACK_BYTE},
    manager::{bundled_font_dir, discover_font, list_fonts, FontManager, DEFAULT_FONT_NAME},
};
pub use input::{
    dispatch::{Action, Command, Dispatch, KeyHandler, Outcome},
    keys::{KeyCode, KeyEvent, Modifiers, UnknownKey},
};
pub use overlay::{
    factory::{OverlayContext, OverlayFactory},
    kind::OverlayKind,
    manager::{FadePhase, OverlayManager, DEFAULT_FADE},
    messages::{self, TemplateValues, ACTION_BAR},
    policy::DismissPolicy,
};
pub use screen::{
    cell::{Color, ScreenCell},
    compositor::{build_base_layer, composite, hotkey_columns, ScreenGeometry},
    layer::{LayerId, ScreenLayer},
    palette::Palette,
    raster::{canvas_size, rasterize, RasterOptions},
};
pub use settings::{FileStore, MemoryStore, Settings, SettingsStore};
pub use viewer::Viewer;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, thiserror::Error)]
pub enum DosViewError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid settings file: {0}")]
    SettingsParse(#[from] toml::de::Error),
    #[error("failed to serialise settings: {0}")]
    SettingsWrite(#[from] toml::ser::Error),
}
