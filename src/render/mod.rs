//! Word-cloud rendering.
//!
//! The pipeline talks to a [`Renderer`] and hands it a [`ColorStrategy`] to
//! call back per term. [`WordCloudRenderer`] is the stock implementation.

pub mod fonts;
pub mod layout;
pub mod wordcloud;

use image::{Rgb, RgbImage};

use crate::error::Result;
use crate::frequency::FrequencyMap;

pub use fonts::{FontCatalog, ResolvedFont};
pub use layout::{LayoutOptions, OccupancyMap};
pub use wordcloud::WordCloudRenderer;

/// Supplies the paint color of each placed term
pub trait ColorStrategy {
    fn color_for(&self, term: &str) -> Rgb<u8>;
}

impl<F> ColorStrategy for F
where
    F: Fn(&str) -> Rgb<u8>,
{
    fn color_for(&self, term: &str) -> Rgb<u8> {
        self(term)
    }
}

/// Everything a renderer needs for one image
pub struct RenderRequest<'a> {
    /// Terms and the weights that size them
    pub frequencies: &'a FrequencyMap,
    /// Per-term colors; `None` selects the renderer's own coloring
    pub colors: Option<&'a dyn ColorStrategy>,
    pub width: u32,
    pub height: u32,
    pub background: Rgb<u8>,
    /// Cap on the number of terms drawn
    pub max_words: usize,
    /// Seed for deterministic placement
    pub seed: u64,
}

/// Lays out and rasterizes a word cloud
pub trait Renderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RgbImage>;
}

/// Parse a CSS color name or hex string into an opaque RGB color
pub fn parse_background(value: &str) -> Result<Rgb<u8>> {
    let color = colorgrad::Color::from_html(value).map_err(|e| {
        crate::error::WordCloudError::invalid_parameter(
            "background",
            format!("'{}' is not a color: {}", value, e),
        )
    })?;
    let [r, g, b, _] = color.to_rgba8();
    Ok(Rgb([r, g, b]))
}
