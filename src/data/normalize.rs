use std::collections::HashMap;

use super::error::LoadError;
use super::model::{Dataset, RawTable};

/// Canonical form of a header: trimmed, lowercased, spaces to underscores,
/// then everything outside `[0-9a-z_]` dropped.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// First column (in order) whose name contains both "material" and "code".
pub fn find_material_column<S: AsRef<str>>(columns: &[S]) -> Option<String> {
    columns
        .iter()
        .map(AsRef::as_ref)
        .find(|c| c.contains("material") && c.contains("code"))
        .map(str::to_string)
}

/// Turn a raw table into a [`Dataset`].
///
/// Fails on a table without columns, on rows whose length differs from the
/// header, and on two headers that end up with the same normalized name.
pub fn normalize(raw: RawTable) -> Result<Dataset, LoadError> {
    let RawTable { headers, rows } = raw;
    if headers.is_empty() {
        return Err(LoadError::NoColumns);
    }

    let expected = headers.len();
    if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
        return Err(LoadError::RaggedRow {
            row,
            expected,
            found: cells.len(),
        });
    }

    let mut seen: HashMap<String, &str> = HashMap::with_capacity(expected);
    let mut column_names = Vec::with_capacity(expected);
    for header in &headers {
        let name = normalize_header(header);
        if let Some(first) = seen.get(&name) {
            return Err(LoadError::NormalizationCollision {
                first: first.to_string(),
                second: header.clone(),
                normalized: name,
            });
        }
        seen.insert(name.clone(), header);
        column_names.push(name);
    }

    let material_column = find_material_column(&column_names);
    Ok(Dataset {
        column_names,
        rows,
        material_column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| CellValue::from(*c)).collect())
                .collect(),
        )
    }

    #[test]
    fn header_pipeline() {
        assert_eq!(normalize_header("  Material Code "), "material_code");
        assert_eq!(normalize_header("Qty (PC)"), "qty_pc");
        assert_eq!(normalize_header("Stor. Loc."), "stor_loc");
        assert_eq!(normalize_header("Città"), "citt");
        assert_eq!(normalize_header("a\tb"), "ab");
        assert_eq!(normalize_header("###"), "");
    }

    #[test]
    fn header_normalization_is_idempotent() {
        for h in ["Material Code", " Plant #2 ", "ÄBC def", "x__y", "Qty (PC)"] {
            let once = normalize_header(h);
            assert_eq!(normalize_header(&once), once, "{h}");
        }
    }

    #[test]
    fn material_column_first_match_wins() {
        let cols = ["plant", "material_description", "code_material", "material_code"];
        assert_eq!(find_material_column(&cols).as_deref(), Some("code_material"));
        assert_eq!(find_material_column(&["materialcodex"]).as_deref(), Some("materialcodex"));
        assert_eq!(find_material_column(&["material", "code"]), None);
        assert_eq!(find_material_column::<&str>(&[]), None);
    }

    #[test]
    fn normalize_keeps_order_and_cells() {
        let ds = normalize(raw(
            &["Material Code", "Plant", "Qty"],
            &[&["M1", "P1", "10"], &["M2", "P2", ""]],
        ))
        .unwrap();
        assert_eq!(ds.column_names, vec!["material_code", "plant", "qty"]);
        assert_eq!(ds.material_column.as_deref(), Some("material_code"));
        assert_eq!(ds.rows[1][2], CellValue::Missing);
        assert_eq!(ds.rows[0][0], CellValue::Text("M1".into()));
    }

    #[test]
    fn no_columns_is_an_error() {
        assert_eq!(normalize(RawTable::default()), Err(LoadError::NoColumns));
    }

    #[test]
    fn zero_rows_is_fine() {
        let ds = normalize(raw(&["Plant"], &[])).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.material_column, None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = normalize(raw(&["a", "b"], &[&["1", "2"], &["3"]])).unwrap_err();
        assert_eq!(
            err,
            LoadError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn colliding_headers_are_rejected() {
        let err = normalize(raw(&["Plant", "Qty", " QTY "], &[])).unwrap_err();
        assert_eq!(
            err,
            LoadError::NormalizationCollision {
                first: "Qty".into(),
                second: " QTY ".into(),
                normalized: "qty".into(),
            }
        );

        let err = normalize(raw(&["Plant#", "Plant"], &[])).unwrap_err();
        assert!(matches!(
            err,
            LoadError::NormalizationCollision { ref normalized, .. } if normalized == "plant"
        ));
    }

    #[test]
    fn space_becomes_underscore_before_symbols_are_stripped() {
        assert_eq!(normalize_header("Qty #"), "qty_");
        assert!(normalize(raw(&["Qty", "Qty #"], &[])).is_ok());
    }
}
