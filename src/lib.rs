//! # go-wordcloud
//!
//! Render word-cloud images from Gene Ontology enrichment tables.
//!
//! A table of GO terms with occurrence counts is split by ontology (BP, CC,
//! MF) and each category becomes one PNG. Term size follows frequency; term
//! color follows a palette ramp normalized against the largest count in the
//! whole table, so intensities are comparable between images.
//!
//! ## Architecture
//!
//! - **Table**: comma/tab-delimited ingestion and category filtering
//! - **Frequency**: display text to occurrence count maps
//! - **Palettes**: named color stops and the frequency-to-color interpolator
//! - **Render**: the renderer seam, font lookup and the stock word-cloud layout
//! - **Pipeline**: per-category orchestration, image writing and the summary

pub mod config;
pub mod error;
pub mod frequency;
pub mod logging;
pub mod palettes;
pub mod pipeline;
pub mod render;
pub mod table;

pub use config::Config;
pub use error::{Result, WordCloudError};
pub use frequency::{DisplayField, FrequencyMap};
pub use logging::{
    generate_run_id, init_tracing, log_error, log_operation_end, log_operation_start,
    log_table_load_stats, log_timed_operation,
};
pub use palettes::{FrequencyColors, Palette, PaletteRegistry, UnknownSchemePolicy};
pub use pipeline::{CategoryOutcome, RenderJob, RunReport};
pub use render::{ColorStrategy, RenderRequest, Renderer, WordCloudRenderer};
pub use table::{Category, Row, Summary, Table};
