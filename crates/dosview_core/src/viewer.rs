use std::path::Path;
use std::time::Duration;

use image::RgbaImage;
use log::{debug, info};

use crate::document::Document;
use crate::font::manager::FontManager;
use crate::input::dispatch::{Action, Command, Dispatch, KeyHandler};
use crate::overlay::factory::{OverlayContext, OverlayFactory};
use crate::overlay::kind::OverlayKind;
use crate::overlay::manager::OverlayManager;
use crate::overlay::messages::ACTION_BAR;
use crate::screen::compositor::{self, ScreenGeometry};
use crate::screen::layer::ScreenLayer;
use crate::screen::palette::Palette;
use crate::screen::raster::{self, RasterOptions};
use crate::settings::Settings;
use crate::{DosViewError, VERSION};

/// The whole viewer: document, overlays, key dispatch and rendering.
#[derive(Debug)]
pub struct Viewer {
    settings: Settings,
    geometry: ScreenGeometry,
    palette: Palette,
    fonts: FontManager,
    document: Document,
    overlays: OverlayManager,
    factory: OverlayFactory,
    keys: KeyHandler,
    library: Vec<String>,
}

impl Viewer {
    pub fn new(settings: Settings, fonts: FontManager, mut document: Document) -> Self {
        let geometry = ScreenGeometry::DOS;
        let palette = settings.palette();
        document.set_word_wrap(settings.word_wrap);

        let mut viewer = Self {
            geometry,
            palette,
            fonts,
            document,
            overlays: OverlayManager::new(settings.fade()),
            factory: OverlayFactory::new(geometry, palette),
            keys: KeyHandler::new(),
            library: Vec::new(),
            settings,
        };

        if !viewer.document.has_content() && viewer.settings.show_welcome {
            viewer.keys = KeyHandler::with_active(OverlayKind::Welcome);
            viewer.apply(Action::Show(OverlayKind::Welcome));
        }
        viewer
    }

    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<(), DosViewError> {
        let document =
            Document::open(path, self.geometry.cols, self.geometry.content_rows())?;
        self.set_document(document);
        Ok(())
    }

    pub fn load_text(&mut self, name: Option<String>, text: &str) {
        let document =
            Document::from_text(name, text, self.geometry.cols, self.geometry.content_rows());
        self.set_document(document);
    }

    /// Replaces the document; a welcome screen goes away once there is content.
    pub fn set_document(&mut self, mut document: Document) {
        document.set_word_wrap(self.settings.word_wrap);
        self.document = document;
        if self.document.has_content() && self.keys.active() == Some(OverlayKind::Welcome) {
            self.handle(Command::Dismiss);
        }
    }

    pub fn set_library(&mut self, entries: Vec<String>) {
        self.library = entries;
    }

    /// Single entry point for host input.
    pub fn handle(&mut self, command: Command) -> Dispatch {
        let outcome = self.keys.handle(command);
        for action in outcome.actions {
            self.apply(action);
        }
        outcome.dispatch
    }

    /// Advances overlay fades.
    pub fn tick(&mut self, delta: Duration) {
        self.overlays.tick(delta);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Show(kind) => {
                self.overlays.remove_all();
                let id = self.overlays.next_id();
                let layer = self.factory.build(kind, id, &self.context());
                self.overlays.add(layer);
            },
            Action::Hide(kind) => {
                self.overlays.remove_kind(kind);
            },
            Action::QueryChanged => {
                let Some(kind) = self.keys.active() else { return };
                if let Some(id) = self.overlays.live_layer(kind) {
                    let layer = self.factory.build(kind, id, &self.context());
                    self.overlays.replace_content(id, layer);
                }
            },
            Action::SubmitSearch(query) => match self.document.search(&query) {
                Some(line) => debug!("found {query:?} on line {line}"),
                None => info!("no match for {query:?}"),
            },
            Action::SubmitGoto(query) => {
                let moved = query.parse().is_ok_and(|line| self.document.goto_line(line));
                if !moved {
                    info!("cannot go to line {query:?}");
                }
            },
            Action::ToggleWordWrap => {
                self.settings.word_wrap = self.document.toggle_word_wrap();
                debug!("word wrap {}", if self.settings.word_wrap { "on" } else { "off" });
            },
            Action::GotoStart => self.document.goto_start(),
            Action::GotoEnd => self.document.goto_end(),
            Action::ScrollLines(lines) => self.document.scroll_by(lines),
            Action::ScrollPages(pages) => {
                for _ in 0..pages.unsigned_abs() {
                    if pages > 0 {
                        self.document.page_down();
                    } else {
                        self.document.page_up();
                    }
                }
            },
            Action::OpenFilePicker => debug!("file picker requested"),
            Action::Terminate => info!("quit confirmed"),
        }
    }

    pub fn context(&self) -> OverlayContext {
        OverlayContext {
            version: VERSION.to_string(),
            file_name: self.document.name().map(str::to_string),
            statistics: self.document.statistics(),
            word_wrap: self.document.word_wrap(),
            query: self.keys.query().to_string(),
            library: self.library.clone(),
        }
    }

    pub fn title(&self) -> String {
        let name = self.document.name().unwrap_or("(no file)");
        if self.document.has_content() {
            let total = self.document.display_lines().len();
            format!("DOSVIEW  {name}  {}/{total}", self.document.top() + 1)
        } else {
            format!("DOSVIEW  {name}")
        }
    }

    /// Base screen with every overlay layer composited on top.
    pub fn compose(&self) -> ScreenLayer {
        let base = compositor::build_base_layer(
            self.geometry,
            &self.title(),
            self.document.visible_lines(),
            ACTION_BAR,
            &self.palette,
        );
        compositor::composite(&base, self.overlays.layers())
    }

    pub fn render(&mut self) -> RgbaImage {
        let screen = self.compose();
        let options =
            RasterOptions { scale: self.settings.scale, antialias: self.settings.antialias };
        raster::rasterize(&screen, &mut self.fonts, &self.palette, options)
    }

    pub fn save_png<P: AsRef<Path>>(&mut self, path: P) -> Result<(), DosViewError> {
        let image = self.render();
        image.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        debug!("wrote {}x{} frame to {}", image.width(), image.height(), path.as_ref().display());
        Ok(())
    }

    pub fn active_overlay(&self) -> Option<OverlayKind> {
        self.keys.active()
    }

    pub fn quit_pending(&self) -> bool {
        self.keys.quit_pending()
    }

    pub fn is_terminated(&self) -> bool {
        self.keys.is_terminated()
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn fonts(&self) -> &FontManager {
        &self.fonts
    }
}
