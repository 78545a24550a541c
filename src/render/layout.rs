//! Placement bookkeeping for the word-cloud layout.
//!
//! [`OccupancyMap`] tracks which canvas pixels are already inked and keeps a
//! summed-area table over them, so testing whether a rectangle is free is
//! four lookups.

use image::GrayImage;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Sizing and orientation knobs of the layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Probability of laying a term out horizontally
    #[serde(default = "default_prefer_horizontal")]
    pub prefer_horizontal: f64,

    /// Smallest font size tried before the layout stops
    #[serde(default = "default_min_font_size")]
    pub min_font_size: u32,

    /// Font size of the most frequent term
    #[serde(default = "default_max_font_size")]
    pub max_font_size: u32,

    /// Font size decrement when a term does not fit
    #[serde(default = "default_font_step")]
    pub font_step: u32,

    /// How strongly frequency differences change font size (0 = rank only)
    #[serde(default = "default_relative_scaling")]
    pub relative_scaling: f64,

    /// Blank pixels kept around every term
    #[serde(default = "default_margin")]
    pub margin: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            prefer_horizontal: default_prefer_horizontal(),
            min_font_size: default_min_font_size(),
            max_font_size: default_max_font_size(),
            font_step: default_font_step(),
            relative_scaling: default_relative_scaling(),
            margin: default_margin(),
        }
    }
}

fn default_prefer_horizontal() -> f64 {
    0.9
}

fn default_min_font_size() -> u32 {
    10
}

fn default_max_font_size() -> u32 {
    180
}

fn default_font_step() -> u32 {
    1
}

fn default_relative_scaling() -> f64 {
    0.5
}

fn default_margin() -> u32 {
    2
}

/// Inked-pixel mask of the canvas with its summed-area table
#[derive(Debug, Clone)]
pub struct OccupancyMap {
    width: u32,
    height: u32,
    mask: Vec<u8>,
    /// `(width + 1) * (height + 1)` prefix sums, first row and column zero
    integral: Vec<u32>,
}

impl OccupancyMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            mask: vec![0; width as usize * height as usize],
            integral: vec![0; (width as usize + 1) * (height as usize + 1)],
        }
    }

    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.mask[y as usize * self.width as usize + x as usize] != 0
    }

    fn integral_at(&self, x: usize, y: usize) -> u32 {
        self.integral[y * (self.width as usize + 1) + x]
    }

    /// Number of inked pixels inside the rectangle
    pub fn region_sum(&self, x: u32, y: u32, w: u32, h: u32) -> u32 {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        self.integral_at(x1, y1) + self.integral_at(x0, y0)
            - self.integral_at(x1, y0)
            - self.integral_at(x0, y1)
    }

    /// Pick a free top-left corner for a `w` x `h` box uniformly at random
    pub fn sample_free<R: Rng>(&self, w: u32, h: u32, rng: &mut R) -> Option<(u32, u32)> {
        if w == 0 || h == 0 || w > self.width || h > self.height {
            return None;
        }

        let x_range = self.width - w + 1;
        let y_range = self.height - h + 1;

        let mut hits: u64 = 0;
        for y in 0..y_range {
            for x in 0..x_range {
                if self.region_sum(x, y, w, h) == 0 {
                    hits += 1;
                }
            }
        }
        if hits == 0 {
            return None;
        }

        let mut target = rng.gen_range(0..hits);
        for y in 0..y_range {
            for x in 0..x_range {
                if self.region_sum(x, y, w, h) == 0 {
                    if target == 0 {
                        return Some((x, y));
                    }
                    target -= 1;
                }
            }
        }
        None
    }

    /// Mark every nonzero pixel of `sprite` placed at `(x, y)` as inked
    pub fn occupy(&mut self, sprite: &GrayImage, x: u32, y: u32) {
        let mut touched = false;
        for (sx, sy, pixel) in sprite.enumerate_pixels() {
            let (cx, cy) = (x + sx, y + sy);
            if pixel[0] == 0 || cx >= self.width || cy >= self.height {
                continue;
            }
            self.mask[cy as usize * self.width as usize + cx as usize] = 1;
            touched = true;
        }
        if touched {
            self.rebuild_integral_from(y);
        }
    }

    /// Recompute prefix sums for canvas rows `from_row` and below
    fn rebuild_integral_from(&mut self, from_row: u32) {
        let stride = self.width as usize + 1;
        for y in from_row as usize..self.height as usize {
            let mut row_sum = 0u32;
            for x in 0..self.width as usize {
                row_sum += self.mask[y * self.width as usize + x] as u32;
                self.integral[(y + 1) * stride + x + 1] = self.integral[y * stride + x + 1] + row_sum;
            }
        }
    }
}
