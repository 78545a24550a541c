//! Frequency-to-color interpolation.
//!
//! A frequency is normalized against the global maximum and mapped onto the
//! palette's stops. Each segment between two stops is quantized into
//! `steps_per_segment` steps, so a palette of `L` stops yields
//! `steps_per_segment * (L - 1) + 1` distinct colors. The lowest frequency
//! maps to the first stop and the global maximum to exactly the last one.
//!
//! [`IndexClamp::Legacy`] reproduces older outputs, where the fine index
//! itself was capped at `L - 2` and colors stay near the first stop.

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WordCloudError};
use crate::frequency::FrequencyMap;
use crate::palettes::Palette;
use crate::render::ColorStrategy;

/// Quantization steps between two adjacent stops
pub const DEFAULT_STEPS_PER_SEGMENT: u32 = 100;

/// Frequency assumed for terms missing from the map
const MISSING_TERM_FREQUENCY: u64 = 1;

/// How the fine-grained palette index is bounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IndexClamp {
    /// Clamp the segment so the full ramp is reachable
    #[default]
    Segment,
    /// Cap the fine index at `L - 2`, as earlier releases did
    Legacy,
}

/// Map a normalized frequency in `[0, 1]` onto the palette.
///
/// Channels are scaled by 255 and truncated.
pub fn interpolate(palette: &Palette, freq_norm: f64, steps_per_segment: u32) -> [u8; 3] {
    interpolate_with(palette, freq_norm, steps_per_segment, IndexClamp::Segment)
}

/// [`interpolate`] with an explicit index clamp
pub fn interpolate_with(
    palette: &Palette,
    freq_norm: f64,
    steps_per_segment: u32,
    clamp: IndexClamp,
) -> [u8; 3] {
    let stops = palette.stops();
    if stops.len() == 1 {
        return to_rgb8(stops[0]);
    }

    let steps = steps_per_segment.max(1) as usize;
    let segments = stops.len() - 1;
    let max_idx = segments * steps;

    let freq_norm = freq_norm.clamp(0.0, 1.0);
    let raw_idx = (freq_norm * segments as f64 * steps as f64).floor() as usize;
    let (start, end, t) = match clamp {
        IndexClamp::Segment => {
            let idx = raw_idx.min(max_idx);
            let segment = (idx / steps).min(segments - 1);
            let t = (idx - segment * steps) as f64 / steps as f64;
            (stops[segment], stops[segment + 1], t)
        }
        IndexClamp::Legacy => {
            let idx = raw_idx.min(segments - 1);
            let segment = idx / steps;
            let t = (idx % steps) as f64 / steps as f64;
            (stops[segment], stops[(segment + 1).min(segments)], t)
        }
    };

    let mut rgb = [0.0; 3];
    for c in 0..3 {
        rgb[c] = start[c] * (1.0 - t) + end[c] * t;
    }
    to_rgb8(rgb)
}

fn to_rgb8(rgb: [f64; 3]) -> [u8; 3] {
    [
        (rgb[0] * 255.0) as u8,
        (rgb[1] * 255.0) as u8,
        (rgb[2] * 255.0) as u8,
    ]
}

/// Colors terms by their frequency in a map, normalized by a shared maximum.
///
/// The maximum comes from the unfiltered table so images of different
/// categories use comparable intensities.
#[derive(Debug, Clone)]
pub struct FrequencyColors<'a> {
    frequencies: &'a FrequencyMap,
    palette: &'a Palette,
    global_max: u64,
    steps_per_segment: u32,
    clamp: IndexClamp,
}

impl<'a> FrequencyColors<'a> {
    pub fn new(
        frequencies: &'a FrequencyMap,
        palette: &'a Palette,
        global_max: u64,
        steps_per_segment: u32,
    ) -> Result<Self> {
        if global_max == 0 {
            return Err(WordCloudError::NoOccurrences);
        }
        if steps_per_segment == 0 {
            return Err(WordCloudError::invalid_parameter(
                "steps_per_segment",
                "must be at least 1",
            ));
        }
        Ok(Self {
            frequencies,
            palette,
            global_max,
            steps_per_segment,
            clamp: IndexClamp::default(),
        })
    }

    pub fn with_index_clamp(mut self, clamp: IndexClamp) -> Self {
        self.clamp = clamp;
        self
    }

    /// Color for `term`; terms absent from the map count as frequency 1
    pub fn rgb_for(&self, term: &str) -> [u8; 3] {
        let frequency = self
            .frequencies
            .get(term)
            .unwrap_or(MISSING_TERM_FREQUENCY);
        let freq_norm = (frequency as f64 / self.global_max as f64).min(1.0);
        interpolate_with(self.palette, freq_norm, self.steps_per_segment, self.clamp)
    }
}

impl ColorStrategy for FrequencyColors<'_> {
    fn color_for(&self, term: &str) -> Rgb<u8> {
        Rgb(self.rgb_for(term))
    }
}
