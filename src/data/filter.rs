use std::collections::{BTreeMap, BTreeSet};

use super::model::Dataset;

/// Columns with more distinct values than this are not offered as filters
/// (the material-code column excepted).
pub const DEFAULT_MAX_OPTIONS: usize = 100;

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// If a column is absent or its set is empty, it means "no filter" (show all).
pub type FilterState = BTreeMap<String, BTreeSet<String>>;

/// One filter control derived from the loaded data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterColumn {
    /// Normalized column name.
    pub column: String,
    /// Position of the column in the dataset.
    pub index: usize,
    /// Distinct non-missing values, sorted.
    pub options: Vec<String>,
    pub is_material: bool,
}

impl FilterColumn {
    /// Human-readable label, e.g. `material_code` → `Material Code`.
    pub fn label(&self) -> String {
        column_label(&self.column)
    }
}

/// Underscores become spaces; a letter is upper-cased when it follows a
/// non-letter and lower-cased otherwise.
pub fn column_label(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut prev_alpha = false;
    for c in column.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Sorted distinct non-missing values of one column of the full dataset.
pub fn distinct_values(dataset: &Dataset, index: usize) -> BTreeSet<&str> {
    dataset.column(index).filter_map(|c| c.as_text()).collect()
}

/// Derive the filter controls for a dataset.
///
/// The material-code column (if detected) always comes first and is kept
/// whatever its cardinality. Every other column is kept only when it has
/// more than one and at most `max_options` distinct values. Options are
/// always computed from the unfiltered data.
pub fn filter_columns(dataset: &Dataset, max_options: usize) -> Vec<FilterColumn> {
    let material = dataset
        .material_column
        .as_deref()
        .and_then(|name| dataset.column_index(name));

    let mut columns = Vec::new();

    if let Some(index) = material {
        columns.push(FilterColumn {
            column: dataset.column_names[index].clone(),
            index,
            options: to_options(distinct_values(dataset, index)),
            is_material: true,
        });
    }

    for (index, name) in dataset.column_names.iter().enumerate() {
        if Some(index) == material {
            continue;
        }
        let values = distinct_values(dataset, index);
        if 1 < values.len() && values.len() <= max_options {
            columns.push(FilterColumn {
                column: name.clone(),
                index,
                options: to_options(values),
                is_material: false,
            });
        }
    }

    columns
}

/// Option lists keyed by column name, for callers that only need the values.
pub fn compute_options(dataset: &Dataset, max_options: usize) -> BTreeMap<String, Vec<String>> {
    filter_columns(dataset, max_options)
        .into_iter()
        .map(|fc| (fc.column, fc.options))
        .collect()
}

fn to_options(values: BTreeSet<&str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

/// Return indices of rows that pass all active filters, in table order.
///
/// A row passes a column filter when:
/// * The column has no entry in `filters`, or an empty one → passes
/// * The row's value for that column is in the selected set → passes
///
/// Selections naming a column that is not among `columns` are ignored.
pub fn filtered_indices(
    dataset: &Dataset,
    columns: &[FilterColumn],
    filters: &FilterState,
) -> Vec<usize> {
    let mut active: Vec<(usize, &BTreeSet<String>)> = Vec::new();
    for (col, selected) in filters {
        if selected.is_empty() {
            continue;
        }
        match columns.iter().find(|fc| fc.column == *col) {
            Some(fc) => active.push((fc.index, selected)),
            None => log::warn!("Ignoring selection on '{col}': not a filterable column"),
        }
    }

    log::debug!(
        "Filtering {} rows with {} active column filter(s)",
        dataset.len(),
        active.len()
    );

    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            active.iter().all(|(index, selected)| {
                row.get(*index)
                    .and_then(|cell| cell.as_text())
                    .is_some_and(|value| selected.contains(value))
            })
        })
        .map(|(i, _)| i)
        .collect()
}

/// Stateless one-shot filtering: derive the eligible columns from `dataset`
/// and apply `filters` against them.
pub fn apply_filters(dataset: &Dataset, filters: &FilterState, max_options: usize) -> Vec<usize> {
    let columns = filter_columns(dataset, max_options);
    filtered_indices(dataset, &columns, filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, RawTable};
    use crate::data::normalize::normalize;

    fn dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
        normalize(RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| CellValue::from(*c)).collect())
                .collect(),
        ))
        .unwrap()
    }

    fn sap() -> Dataset {
        dataset(
            &["Material Code", "Plant", "Qty"],
            &[&["M1", "P1", "10"], &["M2", "P2", "20"], &["M1", "P2", "30"]],
        )
    }

    fn select(pairs: &[(&str, &[&str])]) -> FilterState {
        pairs
            .iter()
            .map(|(c, vals)| (c.to_string(), vals.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    #[test]
    fn options_are_sorted_distinct_and_material_first() {
        let cols = filter_columns(&sap(), DEFAULT_MAX_OPTIONS);
        let names: Vec<_> = cols.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["material_code", "plant", "qty"]);
        assert!(cols[0].is_material);
        assert_eq!(cols[0].options, vec!["M1", "M2"]);
        assert_eq!(cols[1].options, vec!["P1", "P2"]);
        assert_eq!(cols[2].options, vec!["10", "20", "30"]);
    }

    #[test]
    fn material_column_is_presented_first_even_when_not_leftmost() {
        let ds = dataset(&["Plant", "Material Code"], &[&["P1", "M1"], &["P2", "M2"]]);
        let cols = filter_columns(&ds, DEFAULT_MAX_OPTIONS);
        assert_eq!(cols[0].column, "material_code");
        assert_eq!(cols[0].index, 1);
        assert_eq!(cols[1].column, "plant");
    }

    #[test]
    fn single_valued_and_missing_only_columns_are_not_offered() {
        let ds = dataset(
            &["Company", "Plant", "Note"],
            &[&["C1", "P1", ""], &["C1", "P2", ""], &["", "P1", ""]],
        );
        let cols = compute_options(&ds, DEFAULT_MAX_OPTIONS);
        assert!(!cols.contains_key("company"));
        assert!(!cols.contains_key("note"));
        assert_eq!(cols["plant"], vec!["P1", "P2"]);
    }

    #[test]
    fn missing_values_are_not_options() {
        let ds = dataset(&["Plant"], &[&["P1"], &[""], &["P2"]]);
        assert_eq!(distinct_values(&ds, 0).into_iter().collect::<Vec<_>>(), vec!["P1", "P2"]);
    }

    #[test]
    fn cardinality_upper_bound_spares_material_column() {
        let rows: Vec<Vec<String>> = (0..101)
            .map(|i| vec![format!("M{i:03}"), format!("B{i:03}"), format!("P{}", i % 2)])
            .collect();
        let row_refs: Vec<Vec<&str>> = rows
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect();
        let slices: Vec<&[&str]> = row_refs.iter().map(Vec::as_slice).collect();
        let ds = dataset(&["Material Code", "Batch", "Plant"], &slices);

        let cols = filter_columns(&ds, DEFAULT_MAX_OPTIONS);
        let names: Vec<_> = cols.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["material_code", "plant"]);
        assert_eq!(cols[0].options.len(), 101);

        let tighter = filter_columns(&ds, 1);
        assert_eq!(tighter.len(), 1);
    }

    #[test]
    fn exactly_max_options_values_is_still_offered() {
        let rows: Vec<Vec<String>> = (0..101)
            .map(|i| vec![format!("L{:03}", i % 100), format!("B{i:03}")])
            .collect();
        let row_refs: Vec<Vec<&str>> = rows
            .iter()
            .map(|r| r.iter().map(String::as_str).collect())
            .collect();
        let slices: Vec<&[&str]> = row_refs.iter().map(Vec::as_slice).collect();
        let ds = dataset(&["Storage Location", "Batch"], &slices);
        assert_eq!(ds.material_column, None);

        let cols = filter_columns(&ds, DEFAULT_MAX_OPTIONS);
        let names: Vec<_> = cols.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["storage_location"]);
        assert_eq!(cols[0].options.len(), DEFAULT_MAX_OPTIONS);
    }

    #[test]
    fn material_column_kept_with_a_single_value() {
        let ds = dataset(&["Material Code", "Plant"], &[&["M1", "P1"], &["M1", "P2"]]);
        let cols = filter_columns(&ds, DEFAULT_MAX_OPTIONS);
        assert_eq!(cols[0].column, "material_code");
        assert_eq!(cols[0].options, vec!["M1"]);
    }

    #[test]
    fn eligible_columns_respect_bounds() {
        let ds = dataset(
            &["A", "B", "C"],
            &[&["1", "x", "k"], &["2", "x", "k"], &["3", "y", "k"]],
        );
        for fc in filter_columns(&ds, 2) {
            let n = fc.options.len();
            assert!(fc.is_material || (1 < n && n <= 2), "{}", fc.column);
        }
    }

    #[test]
    fn single_column_selection() {
        let ds = sap();
        let rows = apply_filters(&ds, &select(&[("plant", &["P2"])]), DEFAULT_MAX_OPTIONS);
        assert_eq!(rows, vec![1, 2]);
    }

    #[test]
    fn and_across_columns_or_within_column() {
        let ds = sap();
        let filters = select(&[("plant", &["P1", "P2"]), ("material_code", &["M1"])]);
        assert_eq!(apply_filters(&ds, &filters, DEFAULT_MAX_OPTIONS), vec![0, 2]);

        let filters = select(&[("plant", &["P2"]), ("material_code", &["M1"])]);
        assert_eq!(apply_filters(&ds, &filters, DEFAULT_MAX_OPTIONS), vec![2]);
    }

    #[test]
    fn empty_selections_do_not_constrain() {
        let ds = sap();
        assert_eq!(apply_filters(&ds, &FilterState::new(), DEFAULT_MAX_OPTIONS), vec![0, 1, 2]);
        let filters = select(&[("plant", &[])]);
        assert_eq!(apply_filters(&ds, &filters, DEFAULT_MAX_OPTIONS), vec![0, 1, 2]);
    }

    #[test]
    fn selecting_every_option_keeps_every_row() {
        let ds = sap();
        let columns = filter_columns(&ds, DEFAULT_MAX_OPTIONS);
        let filters: FilterState = columns
            .iter()
            .map(|fc| (fc.column.clone(), fc.options.iter().cloned().collect()))
            .collect();
        assert_eq!(filtered_indices(&ds, &columns, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn missing_cells_never_match_a_selection() {
        let ds = dataset(&["Plant", "Qty"], &[&["P1", "1"], &["", "2"], &["P2", "3"]]);
        let filters = select(&[("plant", &["P1", "P2"])]);
        assert_eq!(apply_filters(&ds, &filters, DEFAULT_MAX_OPTIONS), vec![0, 2]);
    }

    #[test]
    fn unknown_and_ineligible_selections_are_ignored() {
        let ds = dataset(
            &["Company", "Plant"],
            &[&["C1", "P1"], &["C1", "P2"]],
        );
        let filters = select(&[("company", &["nope"]), ("does_not_exist", &["x"])]);
        assert_eq!(apply_filters(&ds, &filters, DEFAULT_MAX_OPTIONS), vec![0, 1]);
    }

    #[test]
    fn filtering_is_repeatable() {
        let ds = sap();
        let filters = select(&[("qty", &["30", "10"])]);
        let first = apply_filters(&ds, &filters, DEFAULT_MAX_OPTIONS);
        let second = apply_filters(&ds, &filters, DEFAULT_MAX_OPTIONS);
        assert_eq!(first, vec![0, 2]);
        assert_eq!(first, second);
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(column_label("material_code"), "Material Code");
        assert_eq!(column_label("plant2x"), "Plant2X");
        assert_eq!(column_label("qty"), "Qty");
    }
}
