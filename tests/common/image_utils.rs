//! Image helpers for verifying written word clouds.

use image::{ImageFormat, Rgb, RgbImage};
use std::path::Path;

/// Load a PNG written by a run
pub fn load_rgb(path: &Path) -> RgbImage {
    let bytes = std::fs::read(path).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    image::load_from_memory(&bytes).unwrap().to_rgb8()
}

/// Whether `color` appears anywhere in the image
pub fn contains_color(image: &RgbImage, color: Rgb<u8>) -> bool {
    image.pixels().any(|p| *p == color)
}

/// Number of pixels that differ from the background
pub fn inked_pixels(image: &RgbImage, background: Rgb<u8>) -> usize {
    image.pixels().filter(|p| **p != background).count()
}
