//! Desktop dashboard for SAP spreadsheet exports: load a table, normalize
//! its headers, and narrow it down with per-column multi-select filters.

pub mod app;
pub mod data;
pub mod state;
pub mod ui;
