//! Palettes and frequency-driven color interpolation.
//!
//! Palettes are ordered RGB stops; the interpolator walks them by a term's
//! frequency normalized against the global maximum.

pub mod interpolate;
pub mod palette;

pub use interpolate::{
    interpolate, interpolate_with, FrequencyColors, IndexClamp, DEFAULT_STEPS_PER_SEGMENT,
};
pub use palette::{Palette, PaletteRegistry, UnknownSchemePolicy};
