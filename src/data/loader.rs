use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, DataType, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, RawTable};
use super::normalize::normalize;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Extensions accepted by [`load_file`], for file dialogs.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "parquet", "pq", "json",
];

/// Load and normalize an export.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` / `.xlsm` / `.xlsb` / `.ods` – first worksheet, header in row 1
/// * `.csv`     – header row, one record per line
/// * `.parquet` – any schema, every column rendered as text
/// * `.json`    – `[{ "Plant": "P1", "Qty": 10 }, ...]`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let raw = read_raw(path)?;
    let dataset = normalize(raw).with_context(|| format!("loading {}", path.display()))?;
    Ok(dataset)
}

/// Read a file into a [`RawTable`] without normalizing it.
pub fn read_raw(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        "parquet" | "pq" => read_parquet(path),
        "json" => read_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Source fingerprint
// ---------------------------------------------------------------------------

/// Identity of an input file: if none of these change, the parsed table
/// can be reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceFingerprint {
    pub fn of(path: &Path) -> Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("resolving {}", path.display()))?;
        let meta = std::fs::metadata(&path).context("reading file metadata")?;
        Ok(SourceFingerprint {
            path,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet reader
// ---------------------------------------------------------------------------

/// First worksheet; the first row holds the headers. Short rows are padded
/// with missing cells up to the header width.
fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| anyhow!("opening workbook: {e}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .map_err(|e| anyhow!("reading first worksheet: {e}"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| header_or_placeholder(i, excel_cell(cell).to_string()))
            .collect(),
        None => return Ok(RawTable::default()),
    };

    let width = headers.len();
    let rows: Vec<Vec<CellValue>> = rows
        .map(|r| {
            let mut cells: Vec<CellValue> = r.iter().map(excel_cell).collect();
            if cells.len() < width {
                cells.resize(width, CellValue::Missing);
            }
            cells
        })
        .collect();

    Ok(RawTable::new(headers, rows))
}

/// Blank header cells get `Unnamed: <index>`, so several of them do not
/// collide after normalization.
fn header_or_placeholder(index: usize, header: String) -> String {
    if header.trim().is_empty() {
        format!("Unnamed: {index}")
    } else {
        header
    }
}

/// Markers that spreadsheet and CSV exports use for "no value".
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Text cell from a spreadsheet or CSV; NA markers count as missing.
fn sheet_text(s: &str) -> CellValue {
    if NA_MARKERS.contains(&s) {
        CellValue::Missing
    } else {
        CellValue::from_text(s)
    }
}

/// Coerce a spreadsheet cell to text the way a string-typed read would.
fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Missing,
        Data::String(s) => sheet_text(s),
        Data::Float(f) => CellValue::from_text(format_float(*f)),
        Data::Int(i) => CellValue::Text(i.to_string()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) => CellValue::Text(dt.to_string()),
            None => CellValue::from_text(cell.to_string()),
        },
        other => CellValue::from_text(other.to_string()),
    }
}

/// Whole-number floats lose their `.0` so codes like `4711` stay readable.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per line.
/// Records of the wrong length are passed through so normalization can
/// report them.
fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| header_or_placeholder(i, h.to_string()))
        .collect();

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(sheet_text).collect());
    }

    Ok(RawTable::new(headers, rows))
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Every column, whatever its Arrow type, is rendered with Arrow's display
/// formatter. Nulls become missing cells.
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = rows.len();
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| {
                    if col.is_null(row) {
                        Ok(CellValue::Missing)
                    } else {
                        array_value_to_string(col.as_ref(), row).map(CellValue::from_text)
                    }
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .with_context(|| format!("formatting parquet row {}", offset + row))?;
            rows.push(cells);
        }
    }

    Ok(RawTable::new(headers, rows))
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Material Code": "M1", "Plant": "P1", "Qty": 10 },
///   { "Material Code": "M2", "Plant": "P2" }
/// ]
/// ```
///
/// Headers are the keys in first-seen order; absent keys are missing cells.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(CellValue::Missing, json_cell))
                .collect()
        })
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn json_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::Null => CellValue::Missing,
        JsonValue::String(s) => CellValue::from_text(s.as_str()),
        other => CellValue::from_text(other.to_string()),
    }
}
