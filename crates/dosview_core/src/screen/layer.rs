use super::cell::{Color, ScreenCell};
use crate::overlay::kind::OverlayKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

impl LayerId {
    pub const BASE: Self = Self(0);
}

/// A full `rows × cols` grid of cells.
#[derive(Clone, Debug)]
pub struct ScreenLayer {
    pub id: LayerId,
    /// Overlay that produced this layer, `None` for the base content.
    pub tag: Option<OverlayKind>,
    /// Fade multiplier applied while compositing.
    pub opacity: f32,
    rows: usize,
    cols: usize,
    cells: Vec<ScreenCell>,
}

impl ScreenLayer {
    pub fn new(id: LayerId, rows: usize, cols: usize) -> Self {
        Self { id, tag: None, opacity: 1.0, rows, cols, cells: vec![ScreenCell::BLANK; rows * cols] }
    }

    pub fn tagged(mut self, kind: OverlayKind) -> Self {
        self.tag = Some(kind);
        self
    }

    /// Lays out `template` as a block centered in the grid.
    ///
    /// The block is centered as a whole using its longest line, so leading
    /// spaces inside a line are kept and box edges stay aligned. Cells between
    /// the first and last visible character of a line receive `bg`; everything
    /// else stays transparent.
    pub fn centered_text(
        id: LayerId,
        rows: usize,
        cols: usize,
        template: &str,
        fg: Color,
        bg: Color,
    ) -> Self {
        let mut layer = Self::new(id, rows, cols);
        let lines: Vec<Vec<char>> =
            template.lines().map(|line| line.trim_end().chars().collect()).collect();
        let block_width = lines.iter().map(Vec::len).max().unwrap_or(0);
        let top = rows.saturating_sub(lines.len()) / 2;
        let left = cols.saturating_sub(block_width) / 2;

        for (offset, line) in lines.iter().enumerate() {
            let row = top + offset;
            if row >= rows {
                break;
            }

            let Some(first) = line.iter().position(|&ch| ch != ' ') else {
                continue;
            };

            for (index, &ch) in line.iter().enumerate().skip(first) {
                let col = left + index;
                if col >= cols {
                    break;
                }
                layer.set(row, col, ScreenCell::colored(ch, fg, bg));
            }
        }

        layer
    }

    pub fn rows_len(&self) -> usize {
        self.rows
    }

    pub fn cols_len(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[ScreenCell] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&ScreenCell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, cell: ScreenCell) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = cell;
        }
    }

    /// Writes `text` from `col`, clipped at the right edge. Returns the next column.
    pub fn write_str(
        &mut self,
        row: usize,
        col: usize,
        text: &str,
        fg: Option<Color>,
        bg: Option<Color>,
    ) -> usize {
        let mut col = col;
        for ch in text.chars() {
            if col >= self.cols {
                break;
            }
            self.set(row, col, ScreenCell { ch, fg, bg });
            col += 1;
        }
        col
    }

    pub fn fill_row(&mut self, row: usize, cell: ScreenCell) {
        for col in 0..self.cols {
            self.set(row, col, cell);
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.chunks(self.cols.max(1)).map(|row| row.iter().map(|cell| cell.ch).collect())
    }

    /// All rows joined with newlines, trailing blanks removed.
    pub fn text(&self) -> String {
        self.rows().map(|row| row.trim_end().to_string()).collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FG: Color = Color::rgb(255, 255, 255);
    const BG: Color = Color::rgb(170, 0, 0);

    fn first_visible(layer: &ScreenLayer, row: usize) -> Option<usize> {
        (0..layer.cols_len()).find(|&col| !layer.get(row, col).unwrap().is_blank())
    }

    #[test]
    fn block_is_centered_on_longest_line() {
        let template = "╔════╗\n║ ok ║\n╚════╝";
        let layer = ScreenLayer::centered_text(LayerId(1), 24, 80, template, FG, BG);
        let top = (24 - 3) / 2;
        for row in top..top + 3 {
            assert_eq!(first_visible(&layer, row), Some((80 - 6) / 2));
        }
        assert_eq!(first_visible(&layer, top - 1), None);
    }

    #[test]
    fn leading_spaces_stay_transparent() {
        let template = "  ╔─\n  ║ [Close]\n  ╚─";
        let layer = ScreenLayer::centered_text(LayerId(1), 10, 40, template, FG, BG);
        let left = (40 - 11) / 2;
        assert_eq!(layer.get(3, left + 2).unwrap().ch, '╔');
        assert_eq!(layer.get(4, left + 2).unwrap().ch, '║');
        assert!(!layer.get(3, left).unwrap().is_opaque());
        assert!(layer.get(4, left + 3).unwrap().is_opaque());
    }

    #[test]
    fn oversized_templates_are_clipped() {
        let template = "x".repeat(100);
        let layer = ScreenLayer::centered_text(LayerId(1), 2, 10, &template, FG, BG);
        assert_eq!(layer.rows().next().unwrap(), "x".repeat(10));
    }

    #[test]
    fn write_str_clips_at_edge() {
        let mut layer = ScreenLayer::new(LayerId::BASE, 1, 4);
        assert_eq!(layer.write_str(0, 2, "abc", None, None), 4);
        assert_eq!(layer.text(), "  ab");
    }
}
