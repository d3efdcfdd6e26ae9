/// Cell size of a raw bitmap font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontMetrics {
    /// Pixels per row, at most 8 since each row is a single byte.
    pub width: usize,
    pub height: usize,
}

impl FontMetrics {
    pub const VGA_8X16: Self = Self { width: 8, height: 16 };
    pub const EGA_8X14: Self = Self { width: 8, height: 14 };
    pub const CGA_8X8: Self = Self { width: 8, height: 8 };

    pub fn new(width: usize, height: usize) -> Self {
        Self { width: width.clamp(1, 8), height: height.max(1) }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Size of the glyph table for all 256 code-page positions.
    pub fn table_len(&self) -> usize {
        256 * self.height
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::VGA_8X16
    }
}

/// Monochrome glyph, row-major, `true` for a set pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBitmap {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl GlyphBitmap {
    /// Expands `rows` most-significant-bit first. Missing rows are blank.
    pub fn from_rows(metrics: FontMetrics, rows: &[u8]) -> Self {
        let mut pixels = Vec::with_capacity(metrics.pixel_count());
        for row in 0..metrics.height {
            let bits = rows.get(row).copied().unwrap_or(0);
            for column in 0..metrics.width {
                pixels.push(bits & (0x80 >> column) != 0);
            }
        }

        Self { width: metrics.width, height: metrics.height, pixels }
    }

    /// Hollow rectangle along the outermost pixels.
    pub fn border(metrics: FontMetrics) -> Self {
        let (width, height) = (metrics.width, metrics.height);
        let pixels = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| y == 0 || y + 1 == height || x == 0 || x + 1 == width)
            })
            .collect();

        Self { width, height, pixels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    pub fn is_blank(&self) -> bool {
        !self.pixels.iter().any(|&pixel| pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_expand_msb_first() {
        let glyph = GlyphBitmap::from_rows(FontMetrics::VGA_8X16, &[0b0110_0110]);
        assert_eq!(&glyph.pixels()[..8], &[false, true, true, false, false, true, true, false]);
        assert_eq!(glyph.pixels().len(), 128);
    }

    #[test]
    fn truncated_rows_pad_blank() {
        let glyph = GlyphBitmap::from_rows(FontMetrics::VGA_8X16, &[0xFF, 0xFF]);
        assert!(glyph.pixels()[..16].iter().all(|&pixel| pixel));
        assert!(glyph.pixels()[16..].iter().all(|&pixel| !pixel));
    }

    #[test]
    fn narrow_fonts_use_leading_bits() {
        let glyph = GlyphBitmap::from_rows(FontMetrics::new(6, 8), &[0b1000_0100; 8]);
        assert_eq!(glyph.pixels().len(), 48);
        assert!(glyph.is_set(0, 0));
        assert!(glyph.is_set(5, 7));
        assert!(!glyph.is_set(6, 0));
    }

    #[test]
    fn border_sets_only_the_edges() {
        let glyph = GlyphBitmap::border(FontMetrics::VGA_8X16);
        assert!(glyph.is_set(0, 0));
        assert!(glyph.is_set(7, 15));
        assert!(glyph.is_set(3, 0));
        assert!(glyph.is_set(0, 9));
        assert!(!glyph.is_set(3, 8));
        assert_eq!(glyph.pixels().iter().filter(|&&pixel| pixel).count(), 2 * 8 + 2 * 14);
    }
}
