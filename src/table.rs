//! GO enrichment table loading and category filtering.
//!
//! Tables are read as comma-delimited text first and re-read as tab-delimited
//! text when the comma parse fails. Rows are immutable once loaded.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, WordCloudError};

/// Columns every input table must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["ID", "Description", "ONTOLOGY", "OccurrenceCount"];

/// Name of the aggregate category
pub const ALL_CATEGORIES: &str = "ALL";

/// One GO annotation record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Row {
    /// GO term identifier, e.g. `GO:0006915`
    #[serde(rename = "ID")]
    pub id: String,
    /// Human-readable term name
    #[serde(rename = "Description")]
    pub description: String,
    /// Ontology code (`BP`, `CC` or `MF`)
    #[serde(rename = "ONTOLOGY")]
    pub ontology: String,
    /// Occurrence count driving term size and color
    #[serde(rename = "OccurrenceCount")]
    pub occurrence_count: u64,
}

impl Row {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        ontology: impl Into<String>,
        occurrence_count: u64,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            ontology: ontology.into(),
            occurrence_count,
        }
    }
}

/// Field delimiter a table was parsed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Tab => write!(f, "tab"),
        }
    }
}

/// Ordered sequence of rows sharing the required schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows whose `ONTOLOGY` is exactly `code`
    pub fn count_ontology(&self, code: &str) -> usize {
        self.rows.iter().filter(|row| row.ontology == code).count()
    }

    /// Rows belonging to `category`, or every row for [`Category::All`]
    pub fn filter(&self, category: Category) -> Table {
        filter_by_ontology(self, Some(category.as_str()))
    }

    /// Row counts reported after a run
    pub fn summary(&self) -> Summary {
        Summary {
            total: self.len(),
            bp: self.count_ontology(Category::Bp.as_str()),
            cc: self.count_ontology(Category::Cc.as_str()),
            mf: self.count_ontology(Category::Mf.as_str()),
        }
    }
}

/// Per-ontology row counts of an unfiltered table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub bp: usize,
    pub cc: usize,
    pub mf: usize,
}

/// The image categories produced by a run, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    All,
    Bp,
    Cc,
    Mf,
}

impl Category {
    /// Fixed processing order
    pub const ORDER: [Category; 4] = [Category::All, Category::Bp, Category::Cc, Category::Mf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => ALL_CATEGORIES,
            Category::Bp => "BP",
            Category::Cc => "CC",
            Category::Mf => "MF",
        }
    }

    /// Suffix appended to the output prefix
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Bp => "bp",
            Category::Cc => "cc",
            Category::Mf => "mf",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::All => "All GO terms",
            Category::Bp => "Biological Process (BP)",
            Category::Cc => "Cellular Component (CC)",
            Category::Mf => "Molecular Function (MF)",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Select the rows of one ontology.
///
/// `None` or `"ALL"` (any case) returns the whole table. Any other value is
/// uppercased and compared with each row's `ONTOLOGY`. An empty result is not
/// an error.
pub fn filter_by_ontology(table: &Table, category: Option<&str>) -> Table {
    let wanted = match category {
        None => return table.clone(),
        Some(c) if c.eq_ignore_ascii_case(ALL_CATEGORIES) => return table.clone(),
        Some(c) => c.to_uppercase(),
    };

    Table::from_rows(
        table
            .iter()
            .filter(|row| row.ontology == wanted)
            .cloned()
            .collect(),
    )
}

/// Header and records of a successfully tokenized file
struct RawTable {
    delimiter: Delimiter,
    headers: StringRecord,
    records: Vec<StringRecord>,
}

/// Load a GO enrichment table from disk.
pub fn load_table(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path).map_err(|e| WordCloudError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let raw = parse_with_fallback(&bytes).map_err(|message| WordCloudError::Load {
        path: path.to_path_buf(),
        message,
    })?;

    info!(
        path = %path.display(),
        delimiter = %raw.delimiter,
        rows = raw.records.len(),
        columns = raw.headers.len(),
        "Parsed input table"
    );

    check_schema(&raw.headers)?;
    let table = into_table(raw)?;

    debug!("Loaded {} rows", table.len());
    Ok(table)
}

/// Parse table text held in memory.
pub fn parse_table(bytes: &[u8]) -> Result<Table> {
    let raw = parse_with_fallback(bytes).map_err(|message| WordCloudError::Load {
        path: Default::default(),
        message,
    })?;
    check_schema(&raw.headers)?;
    into_table(raw)
}

/// Comma first, tab second.
///
/// The comma parse counts as failed when the reader reports an error or when
/// it yields a single column while the tab parse succeeds with more.
fn parse_with_fallback(bytes: &[u8]) -> std::result::Result<RawTable, String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    match read_delimited(bytes, Delimiter::Comma) {
        Ok(raw) if raw.headers.len() > 1 => Ok(raw),
        Ok(single_column) => match read_delimited(bytes, Delimiter::Tab) {
            Ok(raw) if raw.headers.len() > 1 => Ok(raw),
            _ => Ok(single_column),
        },
        Err(comma_err) => {
            debug!("Comma-delimited parse failed: {}", comma_err);
            read_delimited(bytes, Delimiter::Tab).map_err(|tab_err| {
                format!(
                    "not readable as comma-delimited ({}) or tab-delimited ({})",
                    comma_err, tab_err
                )
            })
        }
    }
}

fn read_delimited(
    bytes: &[u8],
    delimiter: Delimiter,
) -> std::result::Result<RawTable, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(RawTable {
        delimiter,
        headers,
        records,
    })
}

fn check_schema(headers: &StringRecord) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(WordCloudError::Schema { missing })
    }
}

fn into_table(raw: RawTable) -> Result<Table> {
    let mut rows = Vec::with_capacity(raw.records.len());
    for record in &raw.records {
        let row: Row = record.deserialize(Some(&raw.headers)).map_err(|e| {
            WordCloudError::InvalidRow {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                message: e.to_string(),
            }
        })?;
        rows.push(row);
    }
    Ok(Table::from_rows(rows))
}
