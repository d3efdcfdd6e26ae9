use image::{Rgba, RgbaImage};

use super::cell::Color;
use super::layer::ScreenLayer;
use super::palette::Palette;
use crate::font::manager::FontManager;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOptions {
    /// Device pixels per font pixel.
    pub scale: f32,
    /// Blend partially covered pixels instead of snapping to whole pixels.
    pub antialias: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: 1.0, antialias: false }
    }
}

/// Canvas size for a `rows × cols` grid.
pub fn canvas_size(rows: usize, cols: usize, fonts: &FontManager, options: RasterOptions) -> (u32, u32) {
    let metrics = fonts.metrics();
    let scale = clamp_scale(options.scale);
    (edge(cols, metrics.width, scale), edge(rows, metrics.height, scale))
}

/// Paints every cell of `layer` into a new image.
pub fn rasterize(
    layer: &ScreenLayer,
    fonts: &mut FontManager,
    palette: &Palette,
    options: RasterOptions,
) -> RgbaImage {
    let metrics = fonts.metrics();
    let scale = clamp_scale(options.scale);
    let (width, height) = canvas_size(layer.rows_len(), layer.cols_len(), fonts, options);
    let [r, g, b] = palette.background.rgb;
    let mut image = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));

    for row in 0..layer.rows_len() {
        let y0 = edge(row, metrics.height, scale);
        let y1 = edge(row + 1, metrics.height, scale);
        for col in 0..layer.cols_len() {
            let Some(&cell) = layer.get(row, col) else { continue };
            let x0 = edge(col, metrics.width, scale);
            let x1 = edge(col + 1, metrics.width, scale);

            if let Some(bg) = cell.bg {
                fill_rect(&mut image, (x0, y0, x1, y1), bg, 1.0);
            }

            if cell.ch == ' ' {
                continue;
            }

            let fg = cell.fg.unwrap_or(palette.text);
            let Some(glyph) = fonts.bitmap(cell.ch) else { continue };
            for py in 0..glyph.height() {
                for px in 0..glyph.width() {
                    if !glyph.is_set(px, py) {
                        continue;
                    }

                    if options.antialias {
                        let fx = x0 as f32 + px as f32 * scale;
                        let fy = y0 as f32 + py as f32 * scale;
                        fill_coverage(&mut image, (fx, fy, fx + scale, fy + scale), fg);
                    } else {
                        let rect = (
                            x0 + snap(px, metrics.width, x1 - x0),
                            y0 + snap(py, metrics.height, y1 - y0),
                            x0 + snap(px + 1, metrics.width, x1 - x0),
                            y0 + snap(py + 1, metrics.height, y1 - y0),
                        );
                        fill_rect(&mut image, rect, fg, 1.0);
                    }
                }
            }
        }
    }

    image
}

fn clamp_scale(scale: f32) -> f32 {
    if scale.is_finite() {
        scale.clamp(0.25, 16.0)
    } else {
        1.0
    }
}

/// Pixel boundary of cell `index`. Shared by neighbours, so cells never leave seams.
fn edge(index: usize, cell_pixels: usize, scale: f32) -> u32 {
    ((index * cell_pixels) as f32 * scale).round() as u32
}

/// Offset of font pixel `pixel` inside a cell spanning `span` device pixels.
fn snap(pixel: usize, cell_pixels: usize, span: u32) -> u32 {
    let cell_pixels = cell_pixels.max(1) as u32;
    (pixel as u32 * span + cell_pixels / 2) / cell_pixels
}

fn fill_rect(image: &mut RgbaImage, (x0, y0, x1, y1): (u32, u32, u32, u32), color: Color, coverage: f32) {
    let x1 = x1.min(image.width());
    let y1 = y1.min(image.height());
    for y in y0..y1 {
        for x in x0..x1 {
            blend(image.get_pixel_mut(x, y), color, coverage);
        }
    }
}

fn fill_coverage(image: &mut RgbaImage, (x0, y0, x1, y1): (f32, f32, f32, f32), color: Color) {
    let width = image.width();
    let height = image.height();
    let start_x = x0.floor().max(0.0) as u32;
    let start_y = y0.floor().max(0.0) as u32;
    let end_x = (x1.ceil().max(0.0) as u32).min(width);
    let end_y = (y1.ceil().max(0.0) as u32).min(height);

    for y in start_y..end_y {
        let cover_y = (y1.min(y as f32 + 1.0) - y0.max(y as f32)).max(0.0);
        for x in start_x..end_x {
            let cover_x = (x1.min(x as f32 + 1.0) - x0.max(x as f32)).max(0.0);
            let coverage = cover_x * cover_y;
            if coverage > 0.0 {
                blend(image.get_pixel_mut(x, y), color, coverage);
            }
        }
    }
}

fn blend(pixel: &mut Rgba<u8>, color: Color, coverage: f32) {
    let alpha = (color.alpha * coverage).clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    for channel in 0..3 {
        let src = f32::from(color.rgb[channel]);
        let dst = f32::from(pixel.0[channel]);
        pixel.0[channel] = (src * alpha + dst * (1.0 - alpha)).round() as u8;
    }
    pixel.0[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::bitmap::{FontMetrics, GlyphBitmap};
    use crate::screen::cell::ScreenCell;
    use crate::screen::layer::LayerId;

    fn solid_font() -> FontManager {
        let full = GlyphBitmap::from_rows(FontMetrics::VGA_8X16, &[0xFF; 16]);
        let left = GlyphBitmap::from_rows(FontMetrics::VGA_8X16, &[0x80; 16]);
        FontManager::sparse(FontMetrics::VGA_8X16, [(b'#', full), (b'|', left)])
    }

    fn palette() -> Palette {
        Palette::monochrome()
    }

    #[test]
    fn canvas_scales_with_grid() {
        let fonts = solid_font();
        let options = RasterOptions { scale: 1.5, antialias: false };
        assert_eq!(canvas_size(24, 80, &fonts, options), (960, 576));
    }

    #[test]
    fn set_pixels_take_foreground() {
        let mut fonts = solid_font();
        let mut layer = ScreenLayer::new(LayerId::BASE, 1, 2);
        let white = Color::rgb(255, 255, 255);
        layer.set(0, 0, ScreenCell { ch: '#', fg: Some(white), bg: None });

        let image = rasterize(&layer, &mut fonts, &palette(), RasterOptions::default());
        assert_eq!(image.dimensions(), (16, 16));
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(7, 15).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(8, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn adjacent_cells_leave_no_seams() {
        let mut fonts = solid_font();
        let mut layer = ScreenLayer::new(LayerId::BASE, 1, 3);
        let white = Color::rgb(255, 255, 255);
        for col in 0..3 {
            layer.set(0, col, ScreenCell { ch: '#', fg: Some(white), bg: None });
        }

        let options = RasterOptions { scale: 1.3, antialias: false };
        let image = rasterize(&layer, &mut fonts, &palette(), options);
        for x in 0..image.width() {
            assert_eq!(image.get_pixel(x, 3).0, [255, 255, 255, 255], "seam at x={x}");
        }
    }

    #[test]
    fn antialiasing_blends_partial_pixels() {
        let mut fonts = solid_font();
        let mut layer = ScreenLayer::new(LayerId::BASE, 1, 1);
        let white = Color::rgb(255, 255, 255);
        layer.set(0, 0, ScreenCell { ch: '|', fg: Some(white), bg: None });

        let options = RasterOptions { scale: 1.5, antialias: true };
        let image = rasterize(&layer, &mut fonts, &palette(), options);
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [128, 128, 128, 255]);
        assert_eq!(image.get_pixel(2, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn faded_background_blends_with_canvas() {
        let mut fonts = FontManager::unloaded(FontMetrics::VGA_8X16);
        let mut layer = ScreenLayer::new(LayerId::BASE, 1, 1);
        let bg = Color::rgb(200, 100, 0).with_alpha(0.5);
        layer.set(0, 0, ScreenCell { ch: 'A', fg: None, bg: Some(bg) });

        let image = rasterize(&layer, &mut fonts, &palette(), RasterOptions::default());
        assert_eq!(image.get_pixel(4, 4).0, [100, 50, 0, 255]);
    }
}
