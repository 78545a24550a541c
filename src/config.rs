//! Configuration management for go-wordcloud.
//!
//! Settings are layered with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, WordCloudError};
use crate::frequency::DisplayField;
use crate::palettes::{
    IndexClamp, PaletteRegistry, UnknownSchemePolicy, DEFAULT_STEPS_PER_SEGMENT,
};
use crate::render::{parse_background, LayoutOptions};
use crate::table::Category;

/// Command-line arguments for go-wordcloud
#[derive(Parser, Debug, Default)]
#[command(name = "go-wordcloud")]
#[command(author, version, about = "Render word clouds from GO enrichment tables", long_about = None)]
pub struct Args {
    /// GO enrichment table (CSV or TSV) with ID, Description, ONTOLOGY and OccurrenceCount columns
    #[arg(short, long, env = "GO_WORDCLOUD_INPUT")]
    pub input: Option<PathBuf>,

    /// Output file prefix [default: go_wordcloud]
    #[arg(short, long, env = "GO_WORDCLOUD_OUTPUT")]
    pub output: Option<String>,

    /// Use GO IDs instead of descriptions as word-cloud text
    #[arg(long = "use-id", visible_alias = "id")]
    pub use_id: bool,

    /// Image width in pixels [default: 1200]
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Image height in pixels [default: 800]
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Background color name or hex value [default: white]
    #[arg(short, long)]
    pub background: Option<String>,

    /// Maximum number of terms per image [default: 1000]
    #[arg(short = 'n', long)]
    pub max_words: Option<usize>,

    /// Font family name or TTF/OTF file path [default: system sans-serif]
    #[arg(short, long, env = "GO_WORDCLOUD_FONT")]
    pub font: Option<String>,

    /// Palette applied to every category [default: per-category palette]
    #[arg(short, long, env = "GO_WORDCLOUD_SCHEME")]
    pub scheme: Option<String>,

    /// Seed controlling term placement [default: 42]
    #[arg(short, long)]
    pub random_state: Option<u64>,

    /// List available system fonts and exit
    #[arg(short, long)]
    pub list_fonts: bool,

    /// Skip the image covering all GO categories
    #[arg(long)]
    pub no_all: bool,

    /// Skip the biological process image
    #[arg(long)]
    pub no_bp: bool,

    /// Skip the cellular component image
    #[arg(long)]
    pub no_cc: bool,

    /// Skip the molecular function image
    #[arg(long)]
    pub no_mf: bool,

    /// Path to JSON configuration file
    #[arg(short, long, env = "GO_WORDCLOUD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error) [default: info]
    #[arg(long, env = "GO_WORDCLOUD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// What to do with a palette name that does not exist [default: renderer-default]
    #[arg(long, value_enum)]
    pub unknown_scheme: Option<UnknownSchemePolicy>,

    /// Color steps between two adjacent palette stops [default: 100]
    #[arg(long)]
    pub steps_per_segment: Option<u32>,

    /// How the palette index is clamped; `legacy` matches older outputs [default: segment]
    #[arg(long, value_enum)]
    pub index_clamp: Option<IndexClamp>,

    /// Probability of horizontal terms, 0 to 1 [default: 0.9]
    #[arg(long)]
    pub prefer_horizontal: Option<f64>,

    /// Smallest font size in pixels [default: 10]
    #[arg(long)]
    pub min_font_size: Option<u32>,

    /// Largest font size in pixels [default: 180]
    #[arg(long)]
    pub max_font_size: Option<u32>,

    /// Weight of frequency over rank when sizing terms, 0 to 1 [default: 0.5]
    #[arg(long)]
    pub relative_scaling: Option<f64>,

    /// Blank pixels around each term [default: 2]
    #[arg(long)]
    pub margin: Option<u32>,
}

/// Output image configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base name of the written images
    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// CSS color name or hex value
    #[serde(default = "default_background")]
    pub background: String,
}

/// Term selection and placement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Show GO IDs instead of descriptions
    #[serde(default)]
    pub use_id: bool,

    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Font family name or font file path
    #[serde(default)]
    pub font: Option<String>,

    /// Placement seed
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

/// Palette configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColoringConfig {
    /// Palette overriding every category's default
    #[serde(default)]
    pub scheme: Option<String>,

    #[serde(default)]
    pub unknown_scheme: UnknownSchemePolicy,

    #[serde(default = "default_steps_per_segment")]
    pub steps_per_segment: u32,

    #[serde(default)]
    pub index_clamp: IndexClamp,

    /// Extra palettes by name, channels in [0, 1]
    #[serde(default)]
    pub palettes: BTreeMap<String, Vec<[f64; 3]>>,
}

/// Which category images to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryToggles {
    pub all: bool,
    pub bp: bool,
    pub cc: bool,
    pub mf: bool,
}

impl CategoryToggles {
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::All => self.all,
            Category::Bp => self.bp,
            Category::Cc => self.cc,
            Category::Mf => self.mf,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Input table
    #[serde(default)]
    pub input: Option<PathBuf>,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub cloud: CloudConfig,

    #[serde(default)]
    pub layout: LayoutOptions,

    #[serde(default)]
    pub coloring: ColoringConfig,

    #[serde(default)]
    pub categories: CategoryToggles,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Build the configuration for parsed command-line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => Config::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Override file and default values with the arguments that were given
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(input) = &args.input {
            self.input = Some(input.clone());
        }
        if let Some(prefix) = &args.output {
            self.output.prefix = prefix.clone();
        }
        if let Some(width) = args.width {
            self.output.width = width;
        }
        if let Some(height) = args.height {
            self.output.height = height;
        }
        if let Some(background) = &args.background {
            self.output.background = background.clone();
        }

        if args.use_id {
            self.cloud.use_id = true;
        }
        if let Some(max_words) = args.max_words {
            self.cloud.max_words = max_words;
        }
        if args.font.is_some() {
            self.cloud.font = args.font.clone();
        }
        if let Some(seed) = args.random_state {
            self.cloud.random_state = seed;
        }

        if args.scheme.is_some() {
            self.coloring.scheme = args.scheme.clone();
        }
        if let Some(policy) = args.unknown_scheme {
            self.coloring.unknown_scheme = policy;
        }
        if let Some(steps) = args.steps_per_segment {
            self.coloring.steps_per_segment = steps;
        }
        if let Some(clamp) = args.index_clamp {
            self.coloring.index_clamp = clamp;
        }

        if let Some(value) = args.prefer_horizontal {
            self.layout.prefer_horizontal = value;
        }
        if let Some(value) = args.min_font_size {
            self.layout.min_font_size = value;
        }
        if let Some(value) = args.max_font_size {
            self.layout.max_font_size = value;
        }
        if let Some(value) = args.relative_scaling {
            self.layout.relative_scaling = value;
        }
        if let Some(value) = args.margin {
            self.layout.margin = value;
        }

        self.categories.all &= !args.no_all;
        self.categories.bp &= !args.no_bp;
        self.categories.cc &= !args.no_cc;
        self.categories.mf &= !args.no_mf;

        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
    }

    /// Built-in palettes plus the configured ones
    pub fn palette_registry(&self) -> Result<PaletteRegistry> {
        PaletteRegistry::builtin().with_custom(&self.coloring.palettes)
    }

    pub fn display_field(&self) -> DisplayField {
        DisplayField::from_use_id(self.cloud.use_id)
    }

    pub fn background_color(&self) -> Result<Rgb<u8>> {
        parse_background(&self.output.background)
    }

    /// `{prefix}_{category}.png`
    pub fn output_path(&self, category: Category) -> PathBuf {
        PathBuf::from(format!(
            "{}_{}.png",
            self.output.prefix,
            category.file_suffix()
        ))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.input.is_none() {
            return Err(WordCloudError::config(
                "An input table is required (--input or \"input\" in the config file)",
            ));
        }

        if self.output.prefix.is_empty() {
            return Err(WordCloudError::config("Output prefix cannot be empty"));
        }

        if self.output.width == 0 || self.output.height == 0 {
            return Err(WordCloudError::config(format!(
                "Image size must be positive, got {}x{}",
                self.output.width, self.output.height
            )));
        }

        self.background_color()?;

        if self.cloud.max_words == 0 {
            return Err(WordCloudError::config("max_words must be at least 1"));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(WordCloudError::config(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.log_level
                )));
            }
        }

        if self.coloring.steps_per_segment == 0 {
            return Err(WordCloudError::config("steps_per_segment must be at least 1"));
        }

        self.validate_layout()?;

        let registry = self.palette_registry()?;
        if let Some(scheme) = &self.coloring.scheme {
            if !registry.contains(scheme)
                && self.coloring.unknown_scheme == UnknownSchemePolicy::Reject
            {
                return Err(WordCloudError::config(format!(
                    "Unknown color scheme: {}. Available: {}",
                    scheme,
                    registry.names().join(", ")
                )));
            }
        }

        Ok(())
    }

    fn validate_layout(&self) -> Result<()> {
        let layout = &self.layout;
        if !(0.0..=1.0).contains(&layout.prefer_horizontal) {
            return Err(WordCloudError::config(format!(
                "prefer_horizontal must be within [0, 1], got {}",
                layout.prefer_horizontal
            )));
        }
        if !(0.0..=1.0).contains(&layout.relative_scaling) {
            return Err(WordCloudError::config(format!(
                "relative_scaling must be within [0, 1], got {}",
                layout.relative_scaling
            )));
        }
        if layout.min_font_size == 0 || layout.font_step == 0 {
            return Err(WordCloudError::config(
                "min_font_size and font_step must be at least 1",
            ));
        }
        if layout.min_font_size > layout.max_font_size {
            return Err(WordCloudError::config(format!(
                "min_font_size ({}) exceeds max_font_size ({})",
                layout.min_font_size, layout.max_font_size
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: OutputConfig::default(),
            cloud: CloudConfig::default(),
            layout: LayoutOptions::default(),
            coloring: ColoringConfig::default(),
            categories: CategoryToggles::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            width: default_width(),
            height: default_height(),
            background: default_background(),
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            use_id: false,
            max_words: default_max_words(),
            font: None,
            random_state: default_random_state(),
        }
    }
}

impl Default for ColoringConfig {
    fn default() -> Self {
        Self {
            scheme: None,
            unknown_scheme: UnknownSchemePolicy::default(),
            steps_per_segment: default_steps_per_segment(),
            index_clamp: IndexClamp::default(),
            palettes: BTreeMap::new(),
        }
    }
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self {
            all: true,
            bp: true,
            cc: true,
            mf: true,
        }
    }
}

// Default value functions for serde
fn default_prefix() -> String {
    "go_wordcloud".to_string()
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    800
}

fn default_background() -> String {
    "white".to_string()
}

fn default_max_words() -> usize {
    1000
}

fn default_random_state() -> u64 {
    42
}

fn default_steps_per_segment() -> u32 {
    DEFAULT_STEPS_PER_SEGMENT
}

fn default_log_level() -> String {
    "info".to_string()
}
