//! Integration tests for go-wordcloud
//!
//! These run the whole pipeline against tables on disk. Most use a stub
//! renderer that paints one solid block per term in the strategy's color, so
//! they do not depend on the fonts installed on the machine.

mod common;

use clap::Parser;
use common::{image_utils, test_data};
use go_wordcloud::config::Args;
use go_wordcloud::pipeline::{self, CategoryOutcome};
use go_wordcloud::render::{FontCatalog, LayoutOptions, RenderRequest, Renderer};
use go_wordcloud::{Category, Config, Result, WordCloudError, WordCloudRenderer};
use image::{Rgb, RgbImage};
use pretty_assertions::assert_eq;
use std::path::Path;

const BLOCK: u32 = 8;

/// Paints terms left to right, most frequent first
struct BlockRenderer;

impl Renderer for BlockRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RgbImage> {
        let mut image = RgbImage::from_pixel(request.width, request.height, request.background);
        let mut terms: Vec<_> = request.frequencies.iter().collect();
        terms.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (i, (term, _)) in terms.into_iter().take(request.max_words).enumerate() {
            let color = request
                .colors
                .map(|c| c.color_for(term))
                .unwrap_or(Rgb([0, 0, 0]));
            let x0 = i as u32 * BLOCK;
            for y in 0..BLOCK.min(request.height) {
                for x in x0..(x0 + BLOCK).min(request.width) {
                    image.put_pixel(x, y, color);
                }
            }
        }
        Ok(image)
    }
}

fn config_for(args: &[&str]) -> Config {
    let mut argv = vec!["go-wordcloud"];
    argv.extend_from_slice(args);
    let config = Config::from_args(&Args::try_parse_from(argv).unwrap()).unwrap();
    config.validate().unwrap();
    config
}

fn prefix_in(dir: &Path) -> String {
    dir.join("go").to_string_lossy().to_string()
}

#[test]
fn test_scenario_writes_every_category() {
    let dir = tempfile::tempdir().unwrap();
    let input = test_data::write_table(dir.path(), "go.csv", ',', &test_data::scenario_rows());
    let prefix = prefix_in(dir.path());
    let config = config_for(&["-i", input.to_str().unwrap(), "-o", &prefix, "-w", "64", "-H", "32"]);

    let mut out = Vec::new();
    let report = pipeline::run(&config, &BlockRenderer, &mut out).unwrap();

    assert_eq!(report.written().len(), 4);
    assert_eq!(report.summary.total, 3);
    for suffix in ["all", "bp", "cc", "mf"] {
        assert!(dir.path().join(format!("go_{}.png", suffix)).exists());
    }

    // "desc a" holds the global maximum and gets the last BP stop
    let bp = image_utils::load_rgb(&dir.path().join("go_bp.png"));
    assert_eq!(bp.dimensions(), (64, 32));
    assert_eq!(bp.get_pixel(0, 0), &Rgb([25, 204, 255]));
    assert!(!image_utils::contains_color(&bp, Rgb([0, 0, 0])));

    // "desc c" (3 of 10) sits in the first MF segment
    let mf = image_utils::load_rgb(&dir.path().join("go_mf.png"));
    assert_eq!(mf.get_pixel(0, 0), &Rgb([209, 40, 66]));

    let status = String::from_utf8(out).unwrap();
    assert!(status.contains("[ok] Biological Process (BP) word cloud saved to"));
    assert!(status.contains("Total GO terms: 3"));
}

#[test]
fn test_tab_delimited_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = test_data::write_table(dir.path(), "go.tsv", '\t', &test_data::scenario_rows());
    let prefix = prefix_in(dir.path());
    let config = config_for(&["-i", input.to_str().unwrap(), "-o", &prefix, "-w", "64", "-H", "32"]);

    let report = pipeline::run(&config, &BlockRenderer, &mut Vec::new()).unwrap();
    assert_eq!(report.summary.bp, 1);
    assert_eq!(report.written().len(), 4);
}

#[test]
fn test_missing_column_aborts_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let input = test_data::write_table_without_counts(dir.path());
    let prefix = prefix_in(dir.path());
    let config = config_for(&["-i", input.to_str().unwrap(), "-o", &prefix]);

    let err = pipeline::run(&config, &BlockRenderer, &mut Vec::new()).unwrap_err();
    match &err {
        WordCloudError::Schema { missing } => assert_eq!(missing, &["OccurrenceCount"]),
        other => panic!("expected schema error, got {:?}", other),
    }
    assert!(err.to_string().contains("OccurrenceCount"));

    let pngs = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension() == Some(std::ffi::OsStr::new("png")))
        .count();
    assert_eq!(pngs, 0);
}

#[test]
fn test_empty_category_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let input = test_data::write_table(dir.path(), "go.csv", ',', &test_data::rows_without_cc());
    let prefix = prefix_in(dir.path());
    let config = config_for(&["-i", input.to_str().unwrap(), "-o", &prefix, "-w", "64", "-H", "32"]);

    let mut out = Vec::new();
    let report = pipeline::run(&config, &BlockRenderer, &mut out).unwrap();

    assert_eq!(report.outcome(Category::Cc), Some(&CategoryOutcome::Skipped));
    assert!(matches!(
        report.outcome(Category::Mf),
        Some(CategoryOutcome::Written(_))
    ));
    assert!(matches!(
        report.outcome(Category::All),
        Some(CategoryOutcome::Written(_))
    ));
    assert!(!dir.path().join("go_cc.png").exists());
    assert_eq!(report.summary.cc, 0);

    let status = String::from_utf8(out).unwrap();
    assert!(status.contains("[warn] No GO terms found for CC"));
    assert!(status.contains("Cellular Component (CC): 0"));
}

#[test]
fn test_disabled_categories() {
    let dir = tempfile::tempdir().unwrap();
    let input = test_data::write_table(dir.path(), "go.csv", ',', &test_data::scenario_rows());
    let prefix = prefix_in(dir.path());
    let config = config_for(&[
        "-i",
        input.to_str().unwrap(),
        "-o",
        &prefix,
        "--no-all",
        "--no-mf",
        "-w",
        "64",
        "-H",
        "32",
    ]);

    let report = pipeline::run(&config, &BlockRenderer, &mut Vec::new()).unwrap();
    assert_eq!(report.outcome(Category::All), Some(&CategoryOutcome::Disabled));
    assert_eq!(report.outcome(Category::Mf), Some(&CategoryOutcome::Disabled));
    assert_eq!(report.written().len(), 2);
    assert!(!dir.path().join("go_all.png").exists());
}

#[test]
fn test_write_failure_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = test_data::write_table(dir.path(), "go.csv", ',', &test_data::scenario_rows());
    let prefix = dir
        .path()
        .join("missing_dir")
        .join("go")
        .to_string_lossy()
        .to_string();
    let config = config_for(&["-i", input.to_str().unwrap(), "-o", &prefix, "-w", "16", "-H", "16"]);

    let mut out = Vec::new();
    let report = pipeline::run(&config, &BlockRenderer, &mut out).unwrap();

    assert!(report.written().is_empty());
    assert!(report
        .outcomes
        .iter()
        .all(|(_, outcome)| matches!(outcome, CategoryOutcome::Failed(_))));
    let status = String::from_utf8(out).unwrap();
    assert_eq!(status.matches("[error]").count(), 4);
    assert!(status.contains("Total GO terms: 3"));
}

/// Fails for the category whose only term is "desc a" (BP in the scenario)
struct FailingRenderer {
    error: fn() -> WordCloudError,
}

impl Renderer for FailingRenderer {
    fn render(&self, request: &RenderRequest<'_>) -> Result<RgbImage> {
        let terms: Vec<_> = request.frequencies.iter().map(|(t, _)| t.as_str()).collect();
        if terms == ["desc a"] {
            return Err((self.error)());
        }
        BlockRenderer.render(request)
    }
}

type FailingRun = (tempfile::TempDir, String, Vec<(Category, CategoryOutcome)>);

fn run_with_failing_bp(error: fn() -> WordCloudError) -> FailingRun {
    let dir = tempfile::tempdir().unwrap();
    let input = test_data::write_table(dir.path(), "go.csv", ',', &test_data::scenario_rows());
    let prefix = prefix_in(dir.path());
    let config = config_for(&["-i", input.to_str().unwrap(), "-o", &prefix, "-w", "32", "-H", "16"]);

    let mut out = Vec::new();
    let report = pipeline::run(&config, &FailingRenderer { error }, &mut out).unwrap();
    let status = String::from_utf8(out).unwrap();
    (dir, status, report.outcomes)
}

#[test]
fn test_render_error_fails_only_its_category() {
    let (dir, status, outcomes) = run_with_failing_bp(|| WordCloudError::Render {
        category: String::new(),
        message: "layout exploded".to_string(),
    });

    for (category, outcome) in &outcomes {
        match (category, outcome) {
            (Category::Bp, CategoryOutcome::Failed(message)) => {
                assert!(message.contains("BP"), "{}", message);
                assert!(message.contains("layout exploded"), "{}", message);
            }
            (Category::Bp, other) => panic!("BP should fail, got {:?}", other),
            (_, outcome) => assert!(matches!(outcome, CategoryOutcome::Written(_))),
        }
    }
    assert_eq!(outcomes.len(), 4);
    assert!(!dir.path().join("go_bp.png").exists());
    assert!(dir.path().join("go_mf.png").exists());

    assert!(status.contains("[error] Biological Process (BP) word cloud failed"));
    assert!(status.contains("[ok] Cellular Component (CC) word cloud saved to"));
    assert!(status.contains("Total GO terms: 3"));
}

#[test]
fn test_renderer_parameter_error_is_not_fatal() {
    let (dir, status, outcomes) =
        run_with_failing_bp(|| WordCloudError::invalid_parameter("size", "too small"));

    let failed: Vec<_> = outcomes
        .iter()
        .filter(|(_, outcome)| matches!(outcome, CategoryOutcome::Failed(_)))
        .map(|(category, _)| *category)
        .collect();
    assert_eq!(failed, vec![Category::Bp]);
    match &outcomes[1] {
        (Category::Bp, CategoryOutcome::Failed(message)) => {
            assert!(message.starts_with("Render error for BP"), "{}", message)
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(dir.path().join("go_all.png").exists());
    assert!(status.contains("[error] Biological Process (BP) word cloud failed"));
    assert!(status.contains("Total GO terms: 3"));
}

#[test]
fn test_use_id_changes_display_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = test_data::write_table(dir.path(), "go.csv", ',', &test_data::scenario_rows());
    let prefix = prefix_in(dir.path());
    let config = config_for(&["-i", input.to_str().unwrap(), "-o", &prefix, "--use-id"]);

    struct TermCollector(std::cell::RefCell<Vec<String>>);
    impl Renderer for TermCollector {
        fn render(&self, request: &RenderRequest<'_>) -> Result<RgbImage> {
            self.0
                .borrow_mut()
                .extend(request.frequencies.iter().map(|(t, _)| t.clone()));
            Ok(RgbImage::new(1, 1))
        }
    }

    let collector = TermCollector(Default::default());
    pipeline::run(&config, &collector, &mut Vec::new()).unwrap();
    assert!(collector.0.borrow().iter().all(|t| t.starts_with("GO:")));
}

#[test]
fn test_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = test_data::write_table(dir.path(), "go.csv", ',', &test_data::rows_without_cc());

    let renderer = match FontCatalog::system().resolve(None) {
        Ok(resolved) => WordCloudRenderer::new(resolved.font, LayoutOptions::default()),
        Err(_) => {
            eprintln!("no system font, using the block renderer");
            return run_twice(dir.path(), &input, &BlockRenderer);
        }
    };
    run_twice(dir.path(), &input, &renderer);
}

fn run_twice(dir: &Path, input: &Path, renderer: &dyn Renderer) {
    let mut outputs = Vec::new();
    for run in ["first", "second"] {
        let prefix = dir.join(run).to_string_lossy().to_string();
        let config = config_for(&[
            "-i",
            input.to_str().unwrap(),
            "-o",
            &prefix,
            "-w",
            "400",
            "-H",
            "240",
            "--no-bp",
            "--no-mf",
            "-r",
            "7",
        ]);
        pipeline::run(&config, renderer, &mut Vec::new()).unwrap();
        outputs.push(std::fs::read(dir.join(format!("{}_all.png", run))).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);

    let image = image_utils::load_rgb(&dir.join("first_all.png"));
    assert!(image_utils::inked_pixels(&image, Rgb([255, 255, 255])) > 0);
}
