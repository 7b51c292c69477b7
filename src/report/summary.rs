// Financial summary for a month.

use serde::{Deserialize, Serialize};

use crate::backend::{Expense, Payment};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Sum of paid dues.
    pub income: f64,
    /// Sum of dues still open.
    pub pending: f64,
    pub expenses: f64,
    pub balance: f64,
}

impl FinancialSummary {
    pub fn from_records(payments: &[Payment], expenses: &[Expense]) -> Self {
        let (income, pending) = payments.iter().fold((0.0, 0.0), |(paid, open), p| {
            if p.paid {
                (paid + p.amount, open)
            } else {
                (paid, open + p.amount)
            }
        });
        let expenses: f64 = expenses.iter().map(|e| e.amount).sum();

        Self {
            income,
            pending,
            expenses,
            balance: income - expenses,
        }
    }
}

/// Format an amount as Brazilian reais, e.g. `R$ 1.234,50`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, frac)
}
