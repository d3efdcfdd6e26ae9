use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::font::bitmap::FontMetrics;
use crate::screen::palette::Palette;
use crate::DosViewError;

/// Flat string key-value persistence.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);

    fn flush(&mut self) -> Result<(), DosViewError> {
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: BTreeMap<String, String>,
}

/// Store backed by a TOML file with a `[settings]` table.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens `path`; a missing file starts out empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DosViewError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str::<SettingsFile>(&text)?.settings,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(DosViewError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn flush(&mut self) -> Result<(), DosViewError> {
        let file = SettingsFile { settings: self.values.clone() };
        let text = toml::to_string(&file)?;
        fs::write(&self.path, text)
            .map_err(|source| DosViewError::Io { path: self.path.clone(), source })
    }
}

/// Viewer configuration, passed explicitly to each component.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub font_dir: Option<PathBuf>,
    pub font_name: Option<String>,
    /// Glyph height in pixels; glyphs are always 8 pixels wide.
    pub font_height: usize,
    pub scale: f32,
    pub antialias: bool,
    pub word_wrap: bool,
    pub palette: String,
    pub show_welcome: bool,
    pub fade_millis: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_dir: None,
            font_name: None,
            font_height: 16,
            scale: 1.0,
            antialias: false,
            word_wrap: false,
            palette: "classic".to_string(),
            show_welcome: true,
            fade_millis: 150,
        }
    }
}

impl Settings {
    /// Reads every known key, keeping defaults for missing or invalid values.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = Self::default();
        Self {
            font_dir: store.get("font_dir").filter(|dir| !dir.is_empty()).map(PathBuf::from),
            font_name: store.get("font_name").filter(|name| !name.is_empty()),
            font_height: parse(store, "font_height", defaults.font_height),
            scale: parse(store, "scale", defaults.scale),
            antialias: parse(store, "antialias", defaults.antialias),
            word_wrap: parse(store, "word_wrap", defaults.word_wrap),
            palette: store.get("palette").unwrap_or(defaults.palette),
            show_welcome: parse(store, "show_welcome", defaults.show_welcome),
            fade_millis: parse(store, "fade_millis", defaults.fade_millis),
        }
    }

    pub fn save(&self, store: &mut dyn SettingsStore) -> Result<(), DosViewError> {
        match &self.font_dir {
            Some(dir) => store.set("font_dir", dir.display().to_string()),
            None => store.remove("font_dir"),
        }
        match &self.font_name {
            Some(name) => store.set("font_name", name.clone()),
            None => store.remove("font_name"),
        }
        store.set("font_height", self.font_height.to_string());
        store.set("scale", self.scale.to_string());
        store.set("antialias", self.antialias.to_string());
        store.set("word_wrap", self.word_wrap.to_string());
        store.set("palette", self.palette.clone());
        store.set("show_welcome", self.show_welcome.to_string());
        store.set("fade_millis", self.fade_millis.to_string());
        store.flush()
    }

    pub fn font_metrics(&self) -> FontMetrics {
        match self.font_height {
            16 => FontMetrics::VGA_8X16,
            14 => FontMetrics::EGA_8X14,
            8 => FontMetrics::CGA_8X8,
            height => FontMetrics::new(8, height),
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::by_name(&self.palette).unwrap_or_else(|| {
            warn!("unknown palette `{}`, using classic", self.palette);
            Palette::classic()
        })
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_millis)
    }
}

fn parse<T: FromStr>(store: &dyn SettingsStore, key: &str, default: T) -> T {
    match store.get(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring invalid setting {key} = {raw:?}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        assert_eq!(Settings::load(&MemoryStore::new()), Settings::default());
    }

    #[test]
    fn invalid_values_are_ignored() {
        let mut store = MemoryStore::new();
        store.set("scale", "huge".into());
        store.set("antialias", "true".into());
        let settings = Settings::load(&store);
        assert_eq!(settings.scale, 1.0);
        assert!(settings.antialias);
    }

    #[test]
    fn font_height_selects_named_metrics() {
        let metrics = |font_height| Settings { font_height, ..Settings::default() }.font_metrics();
        assert_eq!(metrics(16), FontMetrics::VGA_8X16);
        assert_eq!(metrics(14), FontMetrics::EGA_8X14);
        assert_eq!(metrics(8), FontMetrics::CGA_8X8);
        assert_eq!(metrics(12), FontMetrics::new(8, 12));
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dosview.toml");
        let settings = Settings {
            font_dir: Some(dir.path().to_path_buf()),
            scale: 2.0,
            word_wrap: true,
            palette: "amber".into(),
            ..Settings::default()
        };

        let mut store = FileStore::open(&path).unwrap();
        settings.save(&mut store).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(Settings::load(&reopened), settings);
        assert_eq!(settings.palette(), Palette::amber());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dosview.toml");
        std::fs::write(&path, "[settings\n").unwrap();
        assert!(matches!(FileStore::open(&path), Err(DosViewError::SettingsParse(_))));
    }
}
