//! Excel I/O
//!
//! - Import: exam export `.xlsx` → [`crate::types::RawGrid`]
//! - Export: ranked lists and student reports → `.xlsx` with charts

mod exporter;
mod importer;

pub use exporter::ReportExporter;
pub use importer::{cell_from_data, grid_from_range, ExcelImporter};
