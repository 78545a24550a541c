//! Test data generation utilities.
//!
//! Writes small GO enrichment tables with known contents.

use std::path::{Path, PathBuf};

pub const HEADER: [&str; 4] = ["ID", "Description", "ONTOLOGY", "OccurrenceCount"];

/// The three-row table used by most scenarios
pub fn scenario_rows() -> Vec<(&'static str, &'static str, &'static str, u64)> {
    vec![
        ("GO:001", "desc a", "BP", 10),
        ("GO:002", "desc b", "CC", 5),
        ("GO:003", "desc c", "MF", 3),
    ]
}

/// Rows without any cellular component term
pub fn rows_without_cc() -> Vec<(&'static str, &'static str, &'static str, u64)> {
    vec![
        ("GO:0006915", "apoptotic process", "BP", 12),
        ("GO:0007049", "cell cycle", "BP", 8),
        ("GO:0004672", "protein kinase activity", "MF", 4),
    ]
}

/// Write rows as a delimited table and return its path
pub fn write_table(
    dir: &Path,
    name: &str,
    delimiter: char,
    rows: &[(&str, &str, &str, u64)],
) -> PathBuf {
    let sep = delimiter.to_string();
    let mut text = HEADER.join(sep.as_str());
    text.push('\n');
    for (id, description, ontology, count) in rows {
        text.push_str(&[*id, *description, *ontology, count.to_string().as_str()].join(sep.as_str()));
        text.push('\n');
    }

    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

/// Write a table whose header lacks the `OccurrenceCount` column
pub fn write_table_without_counts(dir: &Path) -> PathBuf {
    let path = dir.join("no_counts.csv");
    std::fs::write(
        &path,
        "ID,Description,ONTOLOGY\nGO:001,desc a,BP\nGO:002,desc b,CC\n",
    )
    .unwrap();
    path
}
