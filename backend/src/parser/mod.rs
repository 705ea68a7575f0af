//! Generic spreadsheet reader.
//!
//! Turns an uploaded file into a [`Sheet`]: a header row plus typed data
//! rows. Workbooks (XLSX, XLS, XLSB, ODS) go through [`workbook`], anything
//! else is treated as delimited text and goes through [`delimited`] with
//! encoding and delimiter auto-detection. No survey-specific logic here.
//!
//! Both readers skip a fixed number of leading rows before looking for the
//! header, so a survey export with a banner on top reads the same way
//! whichever format it was saved in.

pub mod delimited;
pub mod workbook;

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::{SheetError, SheetResult};

pub use delimited::{decode_content, detect_delimiter, detect_encoding, read_delimited};
pub use workbook::read_workbook;

// =============================================================================
// Cells and Rows
// =============================================================================

/// A single typed cell.
///
/// Serializes untagged so previews render as plain JSON values
/// (`Empty` becomes `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a cell from raw delimited text.
    pub fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A data row with its 1-based line number in the source sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub line: usize,
    pub cells: Vec<Cell>,
}

// =============================================================================
// Sheet
// =============================================================================

/// Where a [`Sheet`] came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceFormat {
    /// First worksheet of a workbook.
    Workbook { sheet: String },
    /// Delimited text.
    Csv { encoding: String, delimiter: char },
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Workbook { sheet } => write!(f, "workbook (sheet '{}')", sheet),
            SourceFormat::Csv { encoding, delimiter } => {
                write!(f, "csv ({}, delimiter '{}')", encoding, format_delimiter(*delimiter))
            }
        }
    }
}

/// Header row plus data rows, leading rows already skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
    pub source: SourceFormat,
}

/// First rows of a sheet, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub total_rows: usize,
}

impl Sheet {
    /// Build a sheet from absolute `(row index, cells)` pairs.
    ///
    /// The header is the first non-blank row at or after `skip_rows`
    /// (0-based). Fully blank data rows are dropped and every row is padded
    /// or truncated to the header width.
    pub fn from_grid<I>(grid: I, skip_rows: usize, source: SourceFormat) -> SheetResult<Self>
    where
        I: IntoIterator<Item = (usize, Vec<Cell>)>,
    {
        let mut grid = grid
            .into_iter()
            .filter(|(index, _)| *index >= skip_rows)
            .filter(|(_, cells)| !cells.iter().all(Cell::is_blank));

        let (_, header_cells) = grid
            .next()
            .ok_or(SheetError::MissingHeader { skip_rows })?;

        // Trailing blank header cells come from ragged rows, not real columns
        let width = header_cells
            .iter()
            .rposition(|c| !c.is_blank())
            .map_or(0, |i| i + 1);

        let headers: Vec<String> = header_cells
            .iter()
            .take(width)
            .enumerate()
            .map(|(i, cell)| {
                if cell.is_blank() {
                    format!("Unnamed: {}", i)
                } else {
                    cell.to_string().trim().to_string()
                }
            })
            .collect();

        let rows = grid
            .map(|(index, mut cells)| {
                cells.resize(width, Cell::Empty);
                SheetRow {
                    line: index + 1,
                    cells,
                }
            })
            .collect();

        Ok(Self {
            headers,
            rows,
            source,
        })
    }

    /// Position of a column, compared after trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers.iter().position(|h| h == wanted)
    }

    /// The first `n` data rows.
    pub fn preview(&self, n: usize) -> Preview {
        Preview {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(n).map(|r| r.cells.clone()).collect(),
            total_rows: self.rows.len(),
        }
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Coarse container type, decided from the leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// ZIP (xlsx, xlsb, ods) or OLE2 (xls) container.
    Workbook,
    /// Anything else.
    Delimited,
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Detect whether bytes hold a workbook or delimited text.
pub fn detect_kind(bytes: &[u8]) -> InputKind {
    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
        InputKind::Workbook
    } else {
        InputKind::Delimited
    }
}

/// Parse uploaded bytes of any supported format.
pub fn parse_bytes(bytes: &[u8], skip_rows: usize) -> SheetResult<Sheet> {
    match detect_kind(bytes) {
        InputKind::Workbook => read_workbook(bytes, skip_rows),
        InputKind::Delimited => read_delimited(bytes, skip_rows),
    }
}

/// Parse a file of any supported format.
///
/// # Example
/// ```ignore
/// let sheet = parse_file("/path/to/encuesta.xlsx", 5)?;
/// println!("Columns: {}", sheet.headers.join(", "));
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P, skip_rows: usize) -> SheetResult<Sheet> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, skip_rows)
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}
