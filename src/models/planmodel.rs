use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "billing_period", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Monthly,
    Yearly,
    Lifetime,
}

impl BillingPeriod {
    /// End of the first billing period starting at `start`, `None` for lifetime plans.
    ///
    /// Calendar arithmetic: a start on the 31st ends on the last day of a
    /// shorter month, and Feb 29 ends on Feb 28 of the next year.
    pub fn end_date(&self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            BillingPeriod::Monthly => start.checked_add_months(Months::new(1)),
            BillingPeriod::Yearly => start.checked_add_months(Months::new(12)),
            BillingPeriod::Lifetime => None,
        }
    }

    pub fn renews(&self) -> bool {
        *self != BillingPeriod::Lifetime
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePlan {
    pub id: Uuid,
    pub service_id: Uuid,
    pub plan_name: String,
    pub description: String,
    pub price: i64,
    pub billing_period: BillingPeriod,
    pub items: Vec<String>,
    pub is_popular: bool,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewServicePlan {
    pub service_id: Uuid,
    pub plan_name: String,
    pub description: String,
    pub price: i64,
    pub billing_period: BillingPeriod,
    pub items: Vec<String>,
    pub is_popular: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct PlanPatch {
    pub plan_name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub billing_period: Option<BillingPeriod>,
    pub items: Option<Vec<String>>,
    pub is_popular: Option<bool>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_monthly_end_date() {
        let start = Utc.with_ymd_and_hms(2025, 3, 15, 10, 30, 0).unwrap();
        let end = BillingPeriod::Monthly.end_date(start).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 4, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_monthly_end_date_clamps_to_month_end() {
        let start = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        let end = BillingPeriod::Monthly.end_date(start).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_yearly_end_date() {
        let start = Utc.with_ymd_and_hms(2024, 2, 29, 8, 0, 0).unwrap();
        let end = BillingPeriod::Yearly.end_date(start).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 2, 28, 8, 0, 0).unwrap());

        let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            BillingPeriod::Yearly.end_date(start).unwrap(),
            Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_lifetime_has_no_end() {
        let start = Utc::now();
        assert!(BillingPeriod::Lifetime.end_date(start).is_none());
        assert!(!BillingPeriod::Lifetime.renews());
        assert!(BillingPeriod::Monthly.renews());
    }
}
