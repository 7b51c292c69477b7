// Paid/unpaid breakdown derived from payment records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub const PAID_LABEL: &str = "Em Dia";
pub const PAID_COLOR: &str = "#10b981";
pub const UNPAID_LABEL: &str = "Inadimplentes";
pub const UNPAID_COLOR: &str = "#ef4444";

/// One bar of an aggregate breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub value: u64,
    pub color: String,
}

impl Bucket {
    pub fn new(name: impl Into<String>, value: u64, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            color: color.into(),
        }
    }
}

/// Minimal view of a payment needed for the breakdown.
pub trait PaymentLike {
    fn member_id(&self) -> &str;
    fn is_paid(&self) -> bool;
}

/// Count members who are up to date versus in arrears.
///
/// A member counts as paid if any of their records is paid. The result always
/// holds the paid bucket followed by the unpaid bucket.
pub fn payment_status<P: PaymentLike>(records: &[P], member: Option<&str>) -> Vec<Bucket> {
    let scoped = records
        .iter()
        .filter(|record| member.is_none_or(|id| record.member_id() == id));

    let mut members = HashSet::new();
    let mut paid = HashSet::new();
    for record in scoped {
        members.insert(record.member_id());
        if record.is_paid() {
            paid.insert(record.member_id());
        }
    }

    let paid_count = paid.len() as u64;
    let unpaid_count = members.difference(&paid).count() as u64;

    vec![
        Bucket::new(PAID_LABEL, paid_count, PAID_COLOR),
        Bucket::new(UNPAID_LABEL, unpaid_count, UNPAID_COLOR),
    ]
}

/// Sum of all bucket values.
pub fn total(buckets: &[Bucket]) -> u64 {
    buckets.iter().map(|b| b.value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rec(&'static str, bool);

    impl PaymentLike for Rec {
        fn member_id(&self) -> &str {
            self.0
        }

        fn is_paid(&self) -> bool {
            self.1
        }
    }

    #[test]
    fn test_any_paid_record_counts_member_as_paid() {
        let records = [Rec("A", true), Rec("A", false), Rec("B", false)];

        let result = payment_status(&records, None);

        assert_eq!(
            result,
            vec![
                Bucket::new("Em Dia", 1, "#10b981"),
                Bucket::new("Inadimplentes", 1, "#ef4444"),
            ]
        );
    }

    #[test]
    fn test_empty_input_keeps_both_buckets() {
        let records: [Rec; 0] = [];

        let result = payment_status(&records, None);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, PAID_LABEL);
        assert_eq!(result[0].value, 0);
        assert_eq!(result[1].name, UNPAID_LABEL);
        assert_eq!(result[1].value, 0);
    }

    #[test]
    fn test_member_filter() {
        let records = [Rec("A", true), Rec("B", false), Rec("B", false)];

        let only_b = payment_status(&records, Some("B"));
        assert_eq!(only_b[0].value, 0);
        assert_eq!(only_b[1].value, 1);

        let nobody = payment_status(&records, Some("Z"));
        assert_eq!(nobody[0].value, 0);
        assert_eq!(nobody[1].value, 0);
    }

    #[test]
    fn test_duplicate_unpaid_records_count_once() {
        let records = [Rec("C", false), Rec("C", false), Rec("D", true), Rec("D", true)];

        let result = payment_status(&records, None);

        assert_eq!(result[0].value, 1);
        assert_eq!(result[1].value, 1);
        assert_eq!(total(&result), 2);
    }
}
