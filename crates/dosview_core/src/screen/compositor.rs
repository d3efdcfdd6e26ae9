use super::cell::ScreenCell;
use super::layer::{LayerId, ScreenLayer};
use super::palette::Palette;

/// Size of the character grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub rows: usize,
    pub cols: usize,
}

impl ScreenGeometry {
    pub const DOS: Self = Self { rows: 24, cols: 80 };

    /// Rows between the title bar and the action bar.
    pub fn content_rows(&self) -> usize {
        self.rows.saturating_sub(2)
    }
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self::DOS
    }
}

/// What the base layer shows on a single row.
#[derive(Clone, Copy, Debug)]
pub enum RowSource<'a> {
    Title(&'a str),
    Content(&'a str),
    ActionBar(&'a str),
}

/// Builds the base layer: title bar, document window, action bar.
pub fn build_base_layer(
    geometry: ScreenGeometry,
    title: &str,
    lines: &[String],
    action_bar: &str,
    palette: &Palette,
) -> ScreenLayer {
    let mut sources = Vec::with_capacity(geometry.rows);
    sources.push(RowSource::Title(title));
    for row in 0..geometry.content_rows() {
        sources.push(RowSource::Content(lines.get(row).map(String::as_str).unwrap_or("")));
    }
    sources.push(RowSource::ActionBar(action_bar));
    sources.truncate(geometry.rows);

    let mut layer = ScreenLayer::new(LayerId::BASE, geometry.rows, geometry.cols);
    for (row, source) in sources.into_iter().enumerate() {
        paint_row(&mut layer, row, source, palette);
    }
    layer
}

pub fn paint_row(layer: &mut ScreenLayer, row: usize, source: RowSource<'_>, palette: &Palette) {
    match source {
        RowSource::Title(text) => {
            let bar = ScreenCell::colored(' ', palette.bar_fg, palette.bar_bg);
            layer.fill_row(row, bar);
            let width = text.chars().count();
            let start = layer.cols_len().saturating_sub(width) / 2;
            layer.write_str(row, start, text, bar.fg, bar.bg);
        },
        RowSource::Content(text) => {
            let blank = ScreenCell { ch: ' ', fg: Some(palette.text), bg: Some(palette.background) };
            layer.fill_row(row, blank);
            layer.write_str(row, 0, text, blank.fg, blank.bg);
        },
        RowSource::ActionBar(text) => paint_action_bar(layer, row, text, palette),
    }
}

/// Paints the action bar, drawing the digits of ` 1`..` 10` markers inverted.
pub fn paint_action_bar(layer: &mut ScreenLayer, row: usize, text: &str, palette: &Palette) {
    let bar = ScreenCell::colored(' ', palette.bar_fg, palette.bar_bg);
    layer.fill_row(row, bar);
    layer.write_str(row, 0, text, bar.fg, bar.bg);

    for col in hotkey_columns(text) {
        if let Some(&cell) = layer.get(row, col) {
            layer.set(row, col, cell.inverted());
        }
    }
}

/// Columns holding hotkey digits. Two-digit `10` is matched before single digits.
pub fn hotkey_columns(text: &str) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    let mut columns = Vec::new();
    let mut index = 0;
    while index + 1 < chars.len() {
        if chars[index] != ' ' {
            index += 1;
            continue;
        }

        if chars[index + 1] == '1' && chars.get(index + 2) == Some(&'0') {
            columns.extend([index + 1, index + 2]);
            index += 3;
        } else if ('1'..='9').contains(&chars[index + 1]) {
            columns.push(index + 1);
            index += 2;
        } else {
            index += 1;
        }
    }
    columns
}

/// Stacks overlays on `base` in order; later layers draw on top.
///
/// Blank overlay cells without a background let the layer beneath show through.
pub fn composite<'a, I>(base: &ScreenLayer, overlays: I) -> ScreenLayer
where
    I: IntoIterator<Item = &'a ScreenLayer>,
{
    let mut output = base.clone();
    for overlay in overlays {
        let rows = overlay.rows_len().min(output.rows_len());
        let cols = overlay.cols_len().min(output.cols_len());
        for row in 0..rows {
            for col in 0..cols {
                let Some(cell) = overlay.get(row, col) else { continue };
                if cell.is_opaque() {
                    output.set(row, col, cell.faded(overlay.opacity));
                }
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::cell::Color;

    #[test]
    fn hotkeys_prefer_two_digit_markers() {
        let text = " 1Help 9Menu 10Quit";
        assert_eq!(hotkey_columns(text), vec![1, 7, 13, 14]);
    }

    #[test]
    fn digits_without_leading_space_are_ignored() {
        assert_eq!(hotkey_columns("v1.0 x2"), Vec::<usize>::new());
        assert_eq!(hotkey_columns(" 0 1"), vec![3]);
    }

    #[test]
    fn action_bar_inverts_digits() {
        let palette = Palette::classic();
        let mut layer = ScreenLayer::new(LayerId::BASE, 1, 20);
        paint_action_bar(&mut layer, 0, " 1Help 10Quit", &palette);

        let digit = layer.get(0, 1).unwrap();
        assert_eq!(digit.fg, Some(palette.bar_bg));
        assert_eq!(digit.bg, Some(palette.bar_fg));
        let label = layer.get(0, 2).unwrap();
        assert_eq!(label.fg, Some(palette.bar_fg));
        assert_eq!(layer.get(0, 8).unwrap().bg, Some(palette.bar_fg));
    }

    #[test]
    fn base_layer_has_title_content_and_bar() {
        let lines = vec!["first".to_string(), "second".to_string()];
        let layer =
            build_base_layer(ScreenGeometry::DOS, "README.TXT", &lines, " 1Help", &Palette::classic());
        let rows: Vec<String> = layer.rows().collect();
        assert_eq!(rows.len(), 24);
        assert_eq!(rows[0].trim(), "README.TXT");
        assert_eq!(rows[1].trim_end(), "first");
        assert_eq!(rows[2].trim_end(), "second");
        assert_eq!(rows[3].trim_end(), "");
        assert_eq!(rows[23].trim_end(), " 1Help");
    }

    #[test]
    fn transparent_cells_pass_through() {
        let mut base = ScreenLayer::new(LayerId::BASE, 1, 3);
        base.write_str(0, 0, "abc", None, None);

        let red = Color::rgb(255, 0, 0);
        let mut overlay = ScreenLayer::new(LayerId(1), 1, 3);
        overlay.set(0, 0, ScreenCell::new('X'));
        overlay.set(0, 1, ScreenCell { ch: ' ', fg: None, bg: Some(red) });
        overlay.opacity = 0.5;

        let output = composite(&base, &[overlay]);
        assert_eq!(output.text(), "X c");
        assert_eq!(output.get(0, 1).unwrap().bg.unwrap().alpha, 0.5);
        assert_eq!(output.get(0, 0).unwrap().fg, None);
    }

    #[test]
    fn later_layers_draw_on_top() {
        let base = ScreenLayer::new(LayerId::BASE, 1, 1);
        let mut lower = ScreenLayer::new(LayerId(1), 1, 1);
        lower.set(0, 0, ScreenCell::new('a'));
        let mut upper = ScreenLayer::new(LayerId(2), 1, 1);
        upper.set(0, 0, ScreenCell::new('b'));

        assert_eq!(composite(&base, &[lower, upper]).text(), "b");
    }
}
