//! The per-category word-cloud pipeline.
//!
//! A run loads the table once, computes the aggregate frequency map and its
//! maximum, then renders each enabled category in the fixed order ALL, BP,
//! CC, MF. Render and write failures only end their own category.

use image::ImageFormat;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, WordCloudError};
use crate::frequency::FrequencyMap;
use crate::logging::{log_error, log_operation_end, log_operation_start, log_table_load_stats};
use crate::palettes::{FrequencyColors, Palette, PaletteRegistry, UnknownSchemePolicy};
use crate::render::{ColorStrategy, RenderRequest, Renderer};
use crate::table::{load_table, Category, Summary, Table};

/// One category's rendering work, consumed by [`render_job`]
#[derive(Debug)]
pub struct RenderJob<'a> {
    pub category: Category,
    pub frequencies: &'a FrequencyMap,
    /// `None` leaves coloring to the renderer
    pub palette: Option<&'a Palette>,
    pub title: &'static str,
    pub output_path: PathBuf,
}

/// What happened to a category during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    /// Turned off by configuration
    Disabled,
    /// No rows for this category
    Skipped,
    /// Image saved at the path
    Written(PathBuf),
    /// Rendering or saving failed
    Failed(String),
}

/// Result of a complete run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcomes: Vec<(Category, CategoryOutcome)>,
    /// Row counts of the unfiltered table
    pub summary: Summary,
}

impl RunReport {
    pub fn outcome(&self, category: Category) -> Option<&CategoryOutcome> {
        self.outcomes
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, outcome)| outcome)
    }

    /// Paths of every image written
    pub fn written(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                CategoryOutcome::Written(path) => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }
}

/// Load the configured input table and render every enabled category.
///
/// Status lines are written to `out`.
pub fn run(config: &Config, renderer: &dyn Renderer, out: &mut dyn Write) -> Result<RunReport> {
    let input = config
        .input
        .as_deref()
        .ok_or_else(|| WordCloudError::config("No input table configured"))?;

    let table = load_table(input)?;
    let summary = table.summary();
    log_table_load_stats(input, summary.total, summary.bp, summary.cc, summary.mf);

    let registry = config.palette_registry()?;
    generate(&table, config, &registry, renderer, out)
}

/// Render every enabled category of an already loaded table
pub fn generate(
    table: &Table,
    config: &Config,
    registry: &PaletteRegistry,
    renderer: &dyn Renderer,
    out: &mut dyn Write,
) -> Result<RunReport> {
    let scheme = config.coloring.scheme.as_deref();
    if let Some(name) = scheme {
        if !registry.contains(name) {
            match config.coloring.unknown_scheme {
                UnknownSchemePolicy::Reject => {
                    return Err(WordCloudError::config(format!(
                        "Unknown color scheme: {}",
                        name
                    )))
                }
                UnknownSchemePolicy::RendererDefault => {
                    writeln!(
                        out,
                        "[warn] Unknown color scheme '{}', using the renderer's default coloring",
                        name
                    )?;
                }
            }
        }
    }

    let field = config.display_field();
    let aggregate = FrequencyMap::from_table(table, field);
    let global_max = aggregate.global_max()?;
    let background = config.background_color()?;
    info!(
        terms = aggregate.len(),
        global_max = global_max,
        "Built aggregate frequency map"
    );

    let mut outcomes = Vec::with_capacity(Category::ORDER.len());
    for category in Category::ORDER {
        if !config.categories.is_enabled(category) {
            outcomes.push((category, CategoryOutcome::Disabled));
            continue;
        }

        let filtered = table.filter(category);
        if filtered.is_empty() {
            warn!(category = %category, "No GO terms for category");
            writeln!(
                out,
                "[warn] No GO terms found for {}, skipping its word cloud",
                category
            )?;
            outcomes.push((category, CategoryOutcome::Skipped));
            continue;
        }

        let category_map;
        let frequencies = if category == Category::All {
            &aggregate
        } else {
            category_map = FrequencyMap::from_table(&filtered, field);
            &category_map
        };

        writeln!(
            out,
            "[info] Generating the {} word cloud with {} GO terms",
            category,
            frequencies.len()
        )?;

        let job = RenderJob {
            category,
            frequencies,
            palette: registry.resolve(scheme, category),
            title: category.title(),
            output_path: config.output_path(category),
        };

        let outcome = match render_job(&job, config, global_max, background, renderer) {
            Ok(()) => {
                writeln!(
                    out,
                    "[ok] {} word cloud saved to {}",
                    job.title,
                    job.output_path.display()
                )?;
                CategoryOutcome::Written(job.output_path.clone())
            }
            Err(e) if !e.is_fatal() => {
                log_error(&e, category.as_str());
                writeln!(out, "[error] {} word cloud failed: {}", job.title, e)?;
                CategoryOutcome::Failed(e.to_string())
            }
            Err(e) => return Err(e),
        };
        outcomes.push((category, outcome));
    }

    let summary = table.summary();
    print_summary(&summary, out)?;

    Ok(RunReport { outcomes, summary })
}

/// Render one job and save it as PNG
pub fn render_job(
    job: &RenderJob<'_>,
    config: &Config,
    global_max: u64,
    background: image::Rgb<u8>,
    renderer: &dyn Renderer,
) -> Result<()> {
    let start = Instant::now();
    let details = format!("{} -> {}", job.title, job.output_path.display());
    log_operation_start("render_category", Some(&details));

    let colors = job
        .palette
        .map(|palette| {
            FrequencyColors::new(
                job.frequencies,
                palette,
                global_max,
                config.coloring.steps_per_segment,
            )
            .map(|colors| colors.with_index_clamp(config.coloring.index_clamp))
        })
        .transpose()?;

    let request = RenderRequest {
        frequencies: job.frequencies,
        colors: colors.as_ref().map(|c| c as &dyn ColorStrategy),
        width: config.output.width,
        height: config.output.height,
        background,
        max_words: config.cloud.max_words,
        seed: config.cloud.random_state,
    };

    let result = renderer
        .render(&request)
        .map_err(|e| match e {
            WordCloudError::Render { message, .. } => WordCloudError::Render {
                category: job.category.to_string(),
                message,
            },
            other if other.is_fatal() => WordCloudError::Render {
                category: job.category.to_string(),
                message: other.to_string(),
            },
            other => other,
        })
        .and_then(|image| {
            image
                .save_with_format(&job.output_path, ImageFormat::Png)
                .map_err(|source| WordCloudError::Write {
                    path: job.output_path.clone(),
                    source,
                })
        });

    log_operation_end("render_category", start, result.is_ok());
    result
}

/// Write the per-ontology row counts
pub fn print_summary(summary: &Summary, out: &mut dyn Write) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "[info] GO enrichment summary:")?;
    writeln!(out, "  - Total GO terms: {}", summary.total)?;
    writeln!(out, "  - Biological Process (BP): {}", summary.bp)?;
    writeln!(out, "  - Cellular Component (CC): {}", summary.cc)?;
    writeln!(out, "  - Molecular Function (MF): {}", summary.mf)?;
    Ok(())
}
