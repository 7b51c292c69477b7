// Report document assembled from a status breakdown and a financial summary.

use chrono::{DateTime, Utc};

use crate::metrics::{self, Bucket};
use crate::period::Period;

use super::summary::FinancialSummary;

/// One line of the member status table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub value: u64,
    pub color: String,
    /// Share of the total, 0..=100.
    pub percent: f64,
}

/// Who a report covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportScope {
    Club,
    Member { id: String, name: String },
}

impl ReportScope {
    pub fn label(&self) -> &str {
        match self {
            ReportScope::Club => "Todos os associados",
            ReportScope::Member { name, .. } => name.as_str(),
        }
    }
}

/// Everything a renderer needs to produce the monthly report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub club_name: String,
    pub period: Period,
    pub scope: ReportScope,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
    pub total: u64,
    pub summary: Option<FinancialSummary>,
}

impl ReportDocument {
    /// The financial summary is club-wide, so it is left out of member reports.
    pub fn assemble(
        club_name: &str,
        period: Period,
        scope: ReportScope,
        breakdown: &[Bucket],
        summary: Option<FinancialSummary>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let total = metrics::total(breakdown);
        let rows = breakdown
            .iter()
            .map(|bucket| ReportRow {
                name: bucket.name.clone(),
                value: bucket.value,
                color: bucket.color.clone(),
                percent: percent(bucket.value, total),
            })
            .collect();
        let summary = match scope {
            ReportScope::Club => summary,
            ReportScope::Member { .. } => None,
        };

        Self {
            title: format!("Relatório de Mensalidades - {}", club_name),
            club_name: club_name.to_string(),
            period,
            scope,
            generated_at,
            rows,
            total,
            summary,
        }
    }
}

fn percent(value: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 * 100.0 / total as f64
    }
}
