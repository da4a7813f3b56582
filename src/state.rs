use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;

use crate::data::filter::{filter_columns, filtered_indices, FilterColumn, FilterState};
use crate::data::loader::{load_file, SourceFingerprint};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Filter controls derived once per load, material column first.
    pub filter_columns: Vec<FilterColumn>,

    /// Per-column filter selections.
    pub filters: FilterState,

    /// Indices of rows passing the current filters.
    pub visible_indices: Vec<usize>,

    /// Upper bound on distinct values for a column to get a filter.
    pub max_options: usize,

    /// Identity of the file `dataset` was read from.
    pub source: Option<SourceFingerprint>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(max_options: usize) -> Self {
        Self {
            dataset: None,
            filter_columns: Vec::new(),
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            max_options,
            source: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, derive its filters and clear selections.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filter_columns = filter_columns(&dataset, self.max_options);
        self.filters = FilterState::default();
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(dataset);
        self.source = None;
        self.status_message = None;
    }

    /// Load `path` unless it is the unchanged file already on screen.
    ///
    /// On failure the previous dataset stays loaded and the error is kept
    /// in `status_message`.
    pub fn open_path(&mut self, path: &Path) {
        if let Err(e) = self.try_open_path(path) {
            log::error!("Failed to load file: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    fn try_open_path(&mut self, path: &Path) -> Result<()> {
        let fingerprint = SourceFingerprint::of(path)?;
        if self.dataset.is_some() && self.source.as_ref() == Some(&fingerprint) {
            log::debug!("{} unchanged, keeping loaded table", path.display());
            return Ok(());
        }

        let dataset = load_file(path)?;
        log::info!(
            "Loaded {} rows with columns {:?} (material column: {:?})",
            dataset.len(),
            dataset.column_names,
            dataset.material_column
        );
        self.set_dataset(dataset);
        self.source = Some(fingerprint);
        Ok(())
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filter_columns, &self.filters);
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &str) {
        if !self.filter_columns.iter().any(|fc| fc.column == column) {
            log::warn!("Ignoring toggle on '{column}': not a filterable column");
            return;
        }
        let selected = self.filters.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every option of a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(fc) = self.filter_columns.iter().find(|fc| fc.column == column) {
            let all: BTreeSet<String> = fc.options.iter().cloned().collect();
            self.filters.insert(column.to_string(), all);
            self.refilter();
        }
    }

    /// Drop the selection of a column, lifting its constraint.
    pub fn clear_selection(&mut self, column: &str) {
        self.filters.remove(column);
        self.refilter();
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear();
        self.refilter();
    }

    /// Number of columns with a non-empty selection.
    pub fn active_filter_count(&self) -> usize {
        self.filters.values().filter(|s| !s.is_empty()).count()
    }
}
