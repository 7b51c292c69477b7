// Backend row types.
// Defines structs for deserializing the hosted tables.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::PaymentLike;

/// Club member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub joined_at: Option<NaiveDate>,
}

fn default_active() -> bool {
    true
}

/// Monthly dues payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub member_id: String,
    /// Month the payment refers to, `YYYY-MM`.
    pub reference_month: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentLike for Payment {
    fn member_id(&self) -> &str {
        &self.member_id
    }

    fn is_paid(&self) -> bool {
        self.paid
    }
}

/// Club expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    pub category: Option<String>,
    pub date: NaiveDate,
}

/// Notice posted to members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
}
