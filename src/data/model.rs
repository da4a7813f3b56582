use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the export
// ---------------------------------------------------------------------------

/// One cell, always held as text. Empty cells are kept apart as `Missing`
/// so they never show up as a filter option.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CellValue {
    Missing,
    Text(String),
}

impl CellValue {
    /// Wrap a raw cell string; the empty string becomes `Missing`.
    pub fn from_text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(s)
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::from_text(s)
    }
}

impl From<Option<String>> for CellValue {
    fn from(s: Option<String>) -> Self {
        s.map(CellValue::from_text).unwrap_or(CellValue::Missing)
    }
}

// ---------------------------------------------------------------------------
// RawTable – what a file reader hands over
// ---------------------------------------------------------------------------

/// Headers exactly as they appeared in the file, rows aligned to them.
/// Shape is not validated here; see [`normalize`](super::normalize::normalize).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the normalized table
// ---------------------------------------------------------------------------

/// A normalized table: canonical column names, rectangular rows, and the
/// detected material-code column (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Normalized column names in file order.
    pub column_names: Vec<String>,
    /// Row-major cells; every row has `column_names.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
    /// Name of the first column whose name mentions both "material" and "code".
    pub material_column: Option<String>,
}

impl Dataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}
