//! The stock word-cloud renderer.
//!
//! Terms are placed largest first. Each term gets a font size derived from its
//! frequency relative to the previous term, an orientation drawn from
//! `prefer_horizontal`, and a free spot chosen uniformly at random among all
//! spots that fit. A term that fits nowhere is tried in the other
//! orientation, then at smaller sizes; the layout ends once the size drops
//! below `min_font_size`.

use image::imageops;
use image::{GrayImage, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusttype::{point, Font, Scale};
use tracing::debug;

use crate::error::{Result, WordCloudError};
use crate::render::layout::{LayoutOptions, OccupancyMap};
use crate::render::{RenderRequest, Renderer};

/// Renders word clouds with a single font
pub struct WordCloudRenderer {
    font: Option<Font<'static>>,
    options: LayoutOptions,
}

impl WordCloudRenderer {
    pub fn new(font: Font<'static>, options: LayoutOptions) -> Self {
        Self {
            font: Some(font),
            options,
        }
    }

    /// A renderer with no usable font; every render fails
    pub fn without_font(options: LayoutOptions) -> Self {
        Self {
            font: None,
            options,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// Outcome of fitting one term onto the canvas
enum Fit {
    Placed(GrayImage, u32, u32),
    /// No visible glyphs; nothing to draw
    Blank,
    /// Shrunk below the minimum size without finding room
    Exhausted,
}

impl Renderer for WordCloudRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RgbImage> {
        let font = self.font.as_ref().ok_or_else(|| WordCloudError::Render {
            category: String::new(),
            message: "no usable font available".to_string(),
        })?;
        if request.width == 0 || request.height == 0 {
            return Err(WordCloudError::invalid_parameter(
                "size",
                "width and height must be positive",
            ));
        }

        let opts = &self.options;
        let mut rng = StdRng::seed_from_u64(request.seed);
        let mut canvas = RgbImage::from_pixel(request.width, request.height, request.background);
        let mut occupancy = OccupancyMap::new(request.width, request.height);
        let default_colors = colorgrad::viridis();

        let mut words: Vec<(&str, u64)> = request
            .frequencies
            .iter()
            .map(|(text, count)| (text.as_str(), *count))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words.truncate(request.max_words);

        let max_count = match words.first() {
            Some((_, count)) if *count > 0 => *count as f64,
            _ => return Ok(canvas),
        };

        let mut font_size = opts.max_font_size.min(request.height);
        let mut last_freq = 1.0;
        let mut placed = 0usize;

        for (text, count) in words {
            if count == 0 {
                continue;
            }
            let freq = count as f64 / max_count;

            let rs = opts.relative_scaling;
            if rs != 0.0 {
                font_size =
                    ((rs * (freq / last_freq) + (1.0 - rs)) * font_size as f64).round() as u32;
            }

            let mut orientation = if rng.gen::<f64>() < opts.prefer_horizontal {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let mut tried_other_orientation = false;

            let fit = loop {
                if font_size < opts.min_font_size {
                    break Fit::Exhausted;
                }
                let Some(sprite) = rasterize(font, text, font_size, opts.margin, orientation)
                else {
                    break Fit::Blank;
                };
                if let Some((x, y)) =
                    occupancy.sample_free(sprite.width(), sprite.height(), &mut rng)
                {
                    break Fit::Placed(sprite, x, y);
                }
                if !tried_other_orientation && opts.prefer_horizontal < 1.0 {
                    orientation = orientation.flipped();
                    tried_other_orientation = true;
                } else {
                    font_size = font_size.saturating_sub(opts.font_step.max(1));
                    orientation = Orientation::Horizontal;
                }
            };

            let (sprite, x, y) = match fit {
                Fit::Placed(sprite, x, y) => (sprite, x, y),
                Fit::Blank => {
                    debug!(term = text, "Skipping term without visible glyphs");
                    last_freq = freq;
                    continue;
                }
                Fit::Exhausted => {
                    debug!(term = text, "Layout stopped: minimum font size reached");
                    break;
                }
            };

            let color = match request.colors {
                Some(strategy) => strategy.color_for(text),
                None => {
                    let [r, g, b, _] = default_colors.at(rng.gen::<f64>()).to_rgba8();
                    Rgb([r, g, b])
                }
            };

            paint(&mut canvas, &sprite, x, y, color);
            occupancy.occupy(&sprite, x, y);
            last_freq = freq;
            placed += 1;
        }

        debug!(placed = placed, "Word cloud layout finished");
        Ok(canvas)
    }
}

/// Coverage mask of `text` at `size` px, padded by `margin` on every side.
///
/// Returns `None` for text without visible glyphs.
fn rasterize(
    font: &Font<'static>,
    text: &str,
    size: u32,
    margin: u32,
    orientation: Orientation,
) -> Option<GrayImage> {
    let scale = Scale::uniform(size as f32);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let (min_x, min_y, max_x, max_y) = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .fold(None, |acc: Option<(i32, i32, i32, i32)>, bb| {
            Some(match acc {
                None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
                Some((x0, y0, x1, y1)) => (
                    x0.min(bb.min.x),
                    y0.min(bb.min.y),
                    x1.max(bb.max.x),
                    y1.max(bb.max.y),
                ),
            })
        })?;

    let width = (max_x - min_x) as u32 + 2 * margin;
    let height = (max_y - min_y) as u32 + 2 * margin;
    let mut sprite = GrayImage::new(width, height);

    for glyph in &glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let x = (gx as i32 + bb.min.x - min_x) as u32 + margin;
            let y = (gy as i32 + bb.min.y - min_y) as u32 + margin;
            if x < width && y < height {
                let value = (coverage * 255.0).round().clamp(0.0, 255.0) as u8;
                let pixel = sprite.get_pixel_mut(x, y);
                pixel[0] = pixel[0].max(value);
            }
        });
    }

    Some(match orientation {
        Orientation::Horizontal => sprite,
        Orientation::Vertical => imageops::rotate270(&sprite),
    })
}

/// Alpha-blend `color` onto the canvas using the sprite as coverage
fn paint(canvas: &mut RgbImage, sprite: &GrayImage, x: u32, y: u32, color: Rgb<u8>) {
    for (sx, sy, coverage) in sprite.enumerate_pixels() {
        let alpha = coverage[0] as u32;
        let (cx, cy) = (x + sx, y + sy);
        if alpha == 0 || cx >= canvas.width() || cy >= canvas.height() {
            continue;
        }
        let dst = canvas.get_pixel_mut(cx, cy);
        for c in 0..3 {
            dst[c] = ((dst[c] as u32 * (255 - alpha) + color[c] as u32 * alpha + 127) / 255) as u8;
        }
    }
}
