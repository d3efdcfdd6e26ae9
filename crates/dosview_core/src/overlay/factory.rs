use super::kind::OverlayKind;
use super::messages::{self, TemplateValues};
use crate::document::Statistics;
use crate::screen::compositor::ScreenGeometry;
use crate::screen::layer::{LayerId, ScreenLayer};
use crate::screen::palette::Palette;

/// Live data an overlay may display.
#[derive(Clone, Debug, Default)]
pub struct OverlayContext {
    pub version: String,
    pub file_name: Option<String>,
    pub statistics: Statistics,
    pub word_wrap: bool,
    pub query: String,
    pub library: Vec<String>,
}

/// Turns overlay kinds into centered, tagged screen layers.
#[derive(Clone, Debug)]
pub struct OverlayFactory {
    geometry: ScreenGeometry,
    palette: Palette,
}

impl OverlayFactory {
    pub fn new(geometry: ScreenGeometry, palette: Palette) -> Self {
        Self { geometry, palette }
    }

    pub fn build(&self, kind: OverlayKind, id: LayerId, context: &OverlayContext) -> ScreenLayer {
        let text = self.text(kind, context);
        ScreenLayer::centered_text(
            id,
            self.geometry.rows,
            self.geometry.cols,
            &text,
            self.palette.overlay_fg,
            self.palette.overlay_bg,
        )
        .tagged(kind)
    }

    /// Final box text for `kind` with placeholders filled in.
    pub fn text(&self, kind: OverlayKind, context: &OverlayContext) -> String {
        if kind == OverlayKind::Library {
            return library_text(&context.library);
        }

        let stats = context.statistics;
        let values = TemplateValues::new()
            .text("version", context.version.as_str())
            .text("fileName", context.file_name.as_deref().unwrap_or("(none)"))
            .number("totalLines", stats.lines)
            .number("totalWords", stats.words)
            .number("totalChars", stats.characters)
            .text("wrap", if context.word_wrap { "on" } else { "off" })
            .text("query", query_tail(&context.query, kind));
        messages::format(messages::template(kind), &values)
    }
}

/// Keeps the end of a long query visible while typing.
fn query_tail(query: &str, kind: OverlayKind) -> String {
    let width = match kind {
        OverlayKind::Search => 36,
        _ => 13,
    };
    let count = query.chars().count();
    query.chars().skip(count.saturating_sub(width)).collect()
}

fn library_text(entries: &[String]) -> String {
    let body: Vec<String> = if entries.is_empty() {
        vec![String::new(), "No recent documents.".to_string(), String::new()]
    } else {
        entries.iter().take(9).enumerate().map(|(index, entry)| format!("{}. {entry}", index + 1)).collect()
    };
    messages::frame("Library", &body, "F6 or Esc to close")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> OverlayFactory {
        OverlayFactory::new(ScreenGeometry::DOS, Palette::classic())
    }

    #[test]
    fn layers_are_tagged_and_sized() {
        let layer = factory().build(OverlayKind::Help, LayerId(3), &OverlayContext::default());
        assert_eq!(layer.tag, Some(OverlayKind::Help));
        assert_eq!(layer.id, LayerId(3));
        assert_eq!((layer.rows_len(), layer.cols_len()), (24, 80));
        assert!(layer.text().contains("F1 or Esc to close"));
    }

    #[test]
    fn statistics_show_live_totals() {
        let context = OverlayContext {
            file_name: Some("README.TXT".into()),
            statistics: Statistics { lines: 3, words: 11, characters: 57 },
            word_wrap: true,
            ..OverlayContext::default()
        };
        let text = factory().text(OverlayKind::Statistics, &context);
        assert!(text.contains("README.TXT"));
        assert!(text.contains(" 3 "));
        assert!(text.contains(" 11 "));
        assert!(text.contains(" 57 "));
        assert!(text.contains("Word wrap:  on"));
    }

    #[test]
    fn long_queries_show_their_end() {
        let context = OverlayContext { query: "1234567890123456".into(), ..OverlayContext::default() };
        let text = factory().text(OverlayKind::Goto, &context);
        assert!(text.contains("Line:       4567890123456"));
    }

    #[test]
    fn library_lists_entries() {
        let context = OverlayContext {
            library: vec!["a.txt".into(), "b.txt".into()],
            ..OverlayContext::default()
        };
        let layer = factory().build(OverlayKind::Library, LayerId(1), &context);
        let text = layer.text();
        assert!(text.contains("1. a.txt"));
        assert!(text.contains("2. b.txt"));
        assert!(factory().text(OverlayKind::Library, &OverlayContext::default()).contains("No recent"));
    }
}
