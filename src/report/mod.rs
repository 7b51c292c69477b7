// Report module.
// Builds the monthly report from cached aggregates and renders it for export.

pub mod document;
pub mod render;
pub mod summary;

pub use document::{ReportDocument, ReportScope};
pub use render::{TextRenderer, export};
pub use summary::{FinancialSummary, format_currency};
