//! go-wordcloud - render word clouds from GO enrichment tables
//!
//! This is the command-line entry point.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use tracing::{error, info, warn};

use go_wordcloud::config::Args;
use go_wordcloud::logging::{generate_run_id, init_tracing, log_timed_operation};
use go_wordcloud::render::FontCatalog;
use go_wordcloud::{pipeline, Config, WordCloudRenderer};

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            println!("[error] {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.list_fonts {
        init_tracing(args.log_level.as_deref().unwrap_or("warn"));
        let catalog = FontCatalog::system();
        writeln!(out, "Available system fonts:")?;
        for (i, family) in catalog.family_names().iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, family)?;
        }
        return Ok(());
    }

    let config = Config::from_args(&args).context("Failed to load configuration")?;
    init_tracing(&config.log_level);
    config.validate().context("Invalid configuration")?;

    let run_id = generate_run_id();
    info!(run_id = %run_id, "Starting go-wordcloud v{}", env!("CARGO_PKG_VERSION"));

    let renderer = build_renderer(&config, &mut out)?;

    let report = log_timed_operation("generate_wordclouds", || {
        pipeline::run(&config, &renderer, &mut out)
    })?;

    info!(
        run_id = %run_id,
        images = report.written().len(),
        "Run finished"
    );
    Ok(())
}

/// Resolve the configured font once for every category
fn build_renderer(config: &Config, out: &mut dyn Write) -> anyhow::Result<WordCloudRenderer> {
    let catalog = FontCatalog::system();
    let requested = config.cloud.font.as_deref();

    let renderer = match catalog.resolve(requested) {
        Ok(resolved) => {
            match requested {
                Some(name) if resolved.fallback => writeln!(
                    out,
                    "[warn] Font '{}' not usable, using the default font {}",
                    name, resolved.name
                )?,
                Some(_) => writeln!(out, "[ok] Using font: {}", resolved.name)?,
                None => info!(font = %resolved.name, "Using default font"),
            }
            WordCloudRenderer::new(resolved.font, config.layout)
        }
        Err(e) => {
            warn!(error = %e, "No font available, rendering will fail");
            writeln!(out, "[warn] {}", e)?;
            WordCloudRenderer::without_font(config.layout)
        }
    };
    Ok(renderer)
}
