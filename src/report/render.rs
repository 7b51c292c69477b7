// Report rendering and export.
// Renderers turn a ReportDocument into bytes; export writes them next to other reports.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::cache::write_atomic;
use crate::error::{AppError, Result};

use super::document::{ReportDocument, ReportScope};
use super::summary::format_currency;

/// Turns a report document into a file body.
pub trait DocumentRenderer {
    /// File extension of the output, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>>;
}

/// Plain-text renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl DocumentRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>> {
        let mut out = String::new();
        render_text(&mut out, document).map_err(|e| AppError::Other(e.to_string()))?;
        Ok(out.into_bytes())
    }
}

fn render_text(out: &mut String, doc: &ReportDocument) -> std::fmt::Result {
    writeln!(out, "{}", doc.title)?;
    writeln!(out, "Período: {}", doc.period)?;
    writeln!(out, "Abrangência: {}", doc.scope.label())?;
    writeln!(
        out,
        "Gerado em: {}",
        doc.generated_at.format("%Y-%m-%d %H:%M UTC")
    )?;
    writeln!(out)?;

    writeln!(out, "Situação dos associados")?;
    for row in &doc.rows {
        writeln!(
            out,
            "  {:<16}{:>6}{:>8.1}%",
            row.name, row.value, row.percent
        )?;
    }
    writeln!(out, "  {:<16}{:>6}", "Total", doc.total)?;

    if let Some(summary) = &doc.summary {
        writeln!(out)?;
        writeln!(out, "Resumo financeiro")?;
        writeln!(out, "  {:<16}{:>16}", "Receitas", format_currency(summary.income))?;
        writeln!(out, "  {:<16}{:>16}", "Em aberto", format_currency(summary.pending))?;
        writeln!(out, "  {:<16}{:>16}", "Despesas", format_currency(summary.expenses))?;
        writeln!(out, "  {:<16}{:>16}", "Saldo", format_currency(summary.balance))?;
    }

    Ok(())
}

/// File name for a report: `relatorio-2024-06.txt` for the club,
/// `relatorio-2024-06-<member id>.txt` for one member.
pub fn report_file_name(document: &ReportDocument, renderer: &dyn DocumentRenderer) -> String {
    match &document.scope {
        ReportScope::Club => format!("relatorio-{}.{}", document.period, renderer.extension()),
        ReportScope::Member { id, .. } => format!(
            "relatorio-{}-{}.{}",
            document.period,
            file_safe(id),
            renderer.extension()
        ),
    }
}

fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Render `document` and write it into `dir`. Returns the written path.
pub fn export(
    document: &ReportDocument,
    renderer: &dyn DocumentRenderer,
    dir: &Path,
) -> Result<PathBuf> {
    let bytes = renderer.render(document)?;
    let path = dir.join(report_file_name(document, renderer));
    write_atomic(&path, &bytes)?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "report exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Bucket, PAID_COLOR, PAID_LABEL, UNPAID_COLOR, UNPAID_LABEL};
    use crate::period::Period;
    use crate::report::summary::FinancialSummary;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn document(summary: Option<FinancialSummary>) -> ReportDocument {
        scoped_document(ReportScope::Club, summary)
    }

    fn scoped_document(scope: ReportScope, summary: Option<FinancialSummary>) -> ReportDocument {
        let breakdown = vec![
            Bucket::new(PAID_LABEL, 1, PAID_COLOR),
            Bucket::new(UNPAID_LABEL, 1, UNPAID_COLOR),
        ];
        ReportDocument::assemble(
            "Atlético",
            Period::new(2024, 6).unwrap(),
            scope,
            &breakdown,
            summary,
            Utc.with_ymd_and_hms(2024, 6, 30, 18, 5, 0).unwrap(),
        )
    }

    #[test]
    fn test_text_render() {
        let text = String::from_utf8(TextRenderer.render(&document(None)).unwrap()).unwrap();

        assert!(text.starts_with("Relatório de Mensalidades - Atlético\n"));
        assert!(text.contains("Período: 2024-06"));
        assert!(text.contains("Abrangência: Todos os associados"));
        assert!(text.contains("Gerado em: 2024-06-30 18:05 UTC"));
        assert!(text.contains("Em Dia"));
        assert!(text.contains("50.0%"));
        assert!(!text.contains("Resumo financeiro"));
    }

    #[test]
    fn test_text_render_with_summary() {
        let summary = FinancialSummary {
            income: 100.0,
            pending: 50.0,
            expenses: 30.0,
            balance: 70.0,
        };
        let text =
            String::from_utf8(TextRenderer.render(&document(Some(summary))).unwrap()).unwrap();

        assert!(text.contains("Resumo financeiro"));
        assert!(text.contains("R$ 100,00"));
        assert!(text.contains("R$ 70,00"));
    }

    #[test]
    fn test_export_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let doc = document(None);

        let path = export(&doc, &TextRenderer, temp_dir.path()).unwrap();

        assert!(path.ends_with("relatorio-2024-06.txt"));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, TextRenderer.render(&doc).unwrap());
    }

    #[test]
    fn test_member_export_names_scope_and_keeps_club_report() {
        let temp_dir = TempDir::new().unwrap();
        let club = export(&document(None), &TextRenderer, temp_dir.path()).unwrap();

        let scope = ReportScope::Member {
            id: "b/7".to_string(),
            name: "Bruno".to_string(),
        };
        let member = export(&scoped_document(scope, None), &TextRenderer, temp_dir.path()).unwrap();

        assert!(member.ends_with("relatorio-2024-06-b_7.txt"));
        assert_ne!(club, member);
        assert!(club.exists());
        let text = std::fs::read_to_string(&member).unwrap();
        assert!(text.contains("Abrangência: Bruno"));
    }
}
