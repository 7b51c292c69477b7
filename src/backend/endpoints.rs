// Backend table reads.
// Typed methods over the members, payments, expenses and announcements tables.

use crate::app::ClubData;
use crate::error::Result;
use crate::period::Period;
use crate::service::PaymentSource;

use super::client::BackendClient;
use super::types::{Announcement, Expense, Member, Payment};

/// Query parameters for a payments read.
pub fn payments_query(period: &Period, member: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("reference_month", format!("eq.{}", period)),
    ];
    if let Some(member) = member {
        params.push(("member_id", format!("eq.{}", member)));
    }
    params
}

/// Query parameters for an expenses read over a whole month.
pub fn expenses_query(period: &Period) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_string()),
        ("date", format!("gte.{}", period.first_day())),
        ("date", format!("lt.{}", period.end_exclusive())),
        ("order", "date.asc".to_string()),
    ]
}

impl BackendClient {
    /// Get all members, ordered by name.
    pub async fn get_members(&self) -> Result<Vec<Member>> {
        let params = [("select", "*"), ("order", "name.asc")];
        let response = self.get_table("members", &params).await?;
        let members: Vec<Member> = response.json().await?;
        Ok(members)
    }

    /// Get payments referring to a month, optionally for one member.
    pub async fn get_payments(&self, period: &Period, member: Option<&str>) -> Result<Vec<Payment>> {
        let params = payments_query(period, member);
        let response = self.get_table("payments", &params).await?;
        let payments: Vec<Payment> = response.json().await?;
        Ok(payments)
    }

    /// Get expenses dated within a month.
    pub async fn get_expenses(&self, period: &Period) -> Result<Vec<Expense>> {
        let params = expenses_query(period);
        let response = self.get_table("expenses", &params).await?;
        let expenses: Vec<Expense> = response.json().await?;
        Ok(expenses)
    }

    /// Get the most recent announcements.
    pub async fn get_announcements(&self, limit: u32) -> Result<Vec<Announcement>> {
        let params = [
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        let response = self.get_table("announcements", &params).await?;
        let announcements: Vec<Announcement> = response.json().await?;
        Ok(announcements)
    }
}

impl PaymentSource for BackendClient {
    async fn fetch_payments(&self, period: &Period, member: Option<&str>) -> Result<Vec<Payment>> {
        self.get_payments(period, member).await
    }
}

impl ClubData for BackendClient {
    async fn members(&self) -> Result<Vec<Member>> {
        self.get_members().await
    }

    async fn expenses(&self, period: &Period) -> Result<Vec<Expense>> {
        self.get_expenses(period).await
    }

    async fn announcements(&self, limit: u32) -> Result<Vec<Announcement>> {
        self.get_announcements(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payments_query() {
        let period = Period::new(2024, 6).unwrap();

        let all = payments_query(&period, None);
        assert!(all.contains(&("reference_month", "eq.2024-06".to_string())));
        assert!(!all.iter().any(|(k, _)| *k == "member_id"));

        let one = payments_query(&period, Some("m1"));
        assert!(one.contains(&("member_id", "eq.m1".to_string())));
    }

    #[test]
    fn test_expenses_query_spans_month() {
        let period = Period::new(2024, 12).unwrap();
        let params = expenses_query(&period);

        assert!(params.contains(&("date", "gte.2024-12-01".to_string())));
        assert!(params.contains(&("date", "lt.2025-01-01".to_string())));
    }
}
