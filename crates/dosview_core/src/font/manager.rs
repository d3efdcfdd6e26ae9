use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use super::bitmap::{FontMetrics, GlyphBitmap};
use super::codepage::{self, FALLBACK_BYTE};
use crate::settings::Settings;
use crate::DosViewError;

/// File name of the font shipped next to the executable.
pub const DEFAULT_FONT_NAME: &str = "cp866-8x16.fnt";

const FONT_EXTENSIONS: &[&str] = &["fnt", "f16", "f14", "f08", "bin", "raw"];

/// Glyph cache over a raw 256-glyph bitmap font.
#[derive(Clone, Debug)]
pub struct FontManager {
    metrics: FontMetrics,
    glyphs: Vec<Option<GlyphBitmap>>,
    source: Option<PathBuf>,
}

impl FontManager {
    /// No font available; every lookup yields `None`.
    pub fn unloaded(metrics: FontMetrics) -> Self {
        Self { metrics, glyphs: Vec::new(), source: None }
    }

    pub fn load<P: AsRef<Path>>(path: P, metrics: FontMetrics) -> Result<Self, DosViewError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|source| DosViewError::Io { path: path.to_path_buf(), source })?;
        let mut manager = Self::from_bytes(&bytes, metrics);
        manager.source = Some(path.to_path_buf());
        info!("loaded font {} ({} bytes)", path.display(), bytes.len());
        Ok(manager)
    }

    /// Leading bytes beyond the glyph table are treated as a header and skipped.
    pub fn from_bytes(bytes: &[u8], metrics: FontMetrics) -> Self {
        let header = bytes.len().saturating_sub(metrics.table_len());
        if header > 0 {
            debug!("skipping {header} byte font header");
        }
        if bytes.len() < metrics.table_len() {
            warn!(
                "font data is truncated ({} of {} bytes), padding with blank rows",
                bytes.len(),
                metrics.table_len()
            );
        }

        let glyphs = (0..256)
            .map(|index| {
                let start = (header + index * metrics.height).min(bytes.len());
                let end = (start + metrics.height).min(bytes.len());
                Some(GlyphBitmap::from_rows(metrics, &bytes[start..end]))
            })
            .collect();

        Self { metrics, glyphs, source: None }
    }

    /// Font holding only the given glyphs. Missing positions resolve lazily.
    pub fn sparse<I>(metrics: FontMetrics, glyphs: I) -> Self
    where
        I: IntoIterator<Item = (u8, GlyphBitmap)>,
    {
        let mut table = vec![None; 256];
        for (byte, glyph) in glyphs {
            if glyph.width() == metrics.width && glyph.height() == metrics.height {
                table[usize::from(byte)] = Some(glyph);
            }
        }

        Self { metrics, glyphs: table, source: None }
    }

    /// Loads the font found by [`discover_font`], or runs without one.
    pub fn discover(settings: &Settings) -> Self {
        let metrics = settings.font_metrics();
        let bundled = bundled_font_dir();
        let found = discover_font(
            settings.font_dir.as_deref(),
            settings.font_name.as_deref(),
            bundled.as_deref(),
        );

        match found {
            Some(path) => Self::load(&path, metrics).unwrap_or_else(|err| {
                warn!("{err}; rendering without a font");
                Self::unloaded(metrics)
            }),
            None => {
                warn!("no font file found; rendering without a font");
                Self::unloaded(metrics)
            },
        }
    }

    pub fn is_loaded(&self) -> bool {
        !self.glyphs.is_empty()
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn bitmap(&mut self, ch: char) -> Option<&GlyphBitmap> {
        self.bitmap_for_byte(codepage::resolve_byte(ch))
    }

    /// Looks up the first scalar of `text`, a space when it has none.
    pub fn bitmap_for_text(&mut self, text: &str) -> Option<&GlyphBitmap> {
        self.bitmap_for_byte(codepage::resolve_text(text))
    }

    fn bitmap_for_byte(&mut self, byte: u8) -> Option<&GlyphBitmap> {
        if !self.is_loaded() {
            return None;
        }

        let metrics = self.metrics;
        let index = usize::from(byte);
        let index = if self.glyphs[index].is_some() { index } else { usize::from(FALLBACK_BYTE) };
        let slot = &mut self.glyphs[index];
        if slot.is_none() {
            debug!("synthesising border glyph for byte {index:#04x}");
        }
        Some(&*slot.get_or_insert_with(|| GlyphBitmap::border(metrics)))
    }
}

/// Directory holding fonts bundled with the executable.
pub fn bundled_font_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let dir = exe.parent()?.join("fonts");
    dir.is_dir().then_some(dir)
}

/// Candidate raw font files under `dir`, sorted by path.
pub fn list_fonts(dir: &Path, metrics: FontMetrics) -> Vec<PathBuf> {
    let mut fonts: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(2)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_font_extension(entry.path()))
        .filter(|entry| {
            entry.metadata().map(|meta| meta.len() >= metrics.table_len() as u64).unwrap_or(false)
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();
    fonts.sort();
    fonts
}

/// Search order: user font directory, then the bundled default font.
pub fn discover_font(
    font_dir: Option<&Path>,
    font_name: Option<&str>,
    bundled_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(dir) = font_dir {
        if let Some(name) = font_name {
            let path = dir.join(name);
            if path.is_file() {
                return Some(path);
            }
            warn!("configured font {} does not exist", path.display());
        }

        if let Some(path) = list_fonts(dir, FontMetrics::default()).into_iter().next() {
            return Some(path);
        }
    }

    let path = bundled_dir?.join(DEFAULT_FONT_NAME);
    path.is_file().then_some(path)
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| FONT_EXTENSIONS.contains(&ext.as_str()))
}
