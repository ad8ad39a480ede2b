use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::{planmodel::{BillingPeriod, ServicePlan}, servicemodel::Service};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "enrollment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
    Failed,
}

impl EnrollmentStatus {
    pub fn to_str(&self) -> &str {
        match self {
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Expired => "expired",
            EnrollmentStatus::Cancelled => "cancelled",
            EnrollmentStatus::Failed => "failed",
        }
    }

    /// Allowed lifecycle moves. Re-asserting the current status is always allowed.
    pub fn can_transition_to(&self, next: EnrollmentStatus) -> bool {
        use EnrollmentStatus::*;

        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (Pending, Active)
                | (Pending, Failed)
                | (Pending, Cancelled)
                | (Active, Expired)
                | (Active, Cancelled)
                | (Expired, Cancelled)
                | (Failed, Cancelled)
        )
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
    Test,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Manual,
    Stripe,
    Midtrans,
    Xendit,
    Other,
}

impl PaymentMethod {
    pub fn to_str(&self) -> &str {
        match self {
            PaymentMethod::Manual => "manual",
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::Midtrans => "midtrans",
            PaymentMethod::Xendit => "xendit",
            PaymentMethod::Other => "other",
        }
    }
}

/// Gateway-specific payment payload, one variant per [`PaymentMethod`].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PaymentGatewayData {
    Manual {
        reference: Option<String>,
        confirmed_by: Option<Uuid>,
    },
    Stripe {
        payment_intent_id: String,
        customer_id: Option<String>,
    },
    Midtrans {
        order_id: String,
        transaction_status: Option<String>,
        fraud_status: Option<String>,
    },
    Xendit {
        invoice_id: String,
        external_id: Option<String>,
    },
    Other {
        provider: String,
        reference: Option<String>,
    },
}

impl PaymentGatewayData {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentGatewayData::Manual { .. } => PaymentMethod::Manual,
            PaymentGatewayData::Stripe { .. } => PaymentMethod::Stripe,
            PaymentGatewayData::Midtrans { .. } => PaymentMethod::Midtrans,
            PaymentGatewayData::Xendit { .. } => PaymentMethod::Xendit,
            PaymentGatewayData::Other { .. } => PaymentMethod::Other,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub plan_id: Uuid,
    pub status: EnrollmentStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub payment_gateway_data: Option<Json<PaymentGatewayData>>,
    pub amount: i64,
    pub currency: String,
    pub billing_period: BillingPeriod,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub next_billing_date: Option<DateTime<Utc>>,
    pub auto_renew: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWithDetails {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub service: Option<Service>,
    pub plan: Option<ServicePlan>,
}

#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub plan_id: Uuid,
    pub status: EnrollmentStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub payment_gateway_data: Option<PaymentGatewayData>,
    pub amount: i64,
    pub currency: String,
    pub billing_period: BillingPeriod,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub next_billing_date: Option<DateTime<Utc>>,
    pub auto_renew: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentPatch {
    pub status: Option<EnrollmentStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub transaction_id: Option<String>,
    pub payment_gateway_data: Option<PaymentGatewayData>,
    pub auto_renew: Option<bool>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
    pub notes: Option<String>,
}

/// Admin listing filter. Status and payment status are not combinable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnrollmentFilter {
    All,
    Status(EnrollmentStatus),
    PaymentStatus(PaymentStatus),
}

impl EnrollmentFilter {
    pub fn matches(&self, enrollment: &Enrollment) -> bool {
        match self {
            EnrollmentFilter::All => true,
            EnrollmentFilter::Status(status) => enrollment.status == *status,
            EnrollmentFilter::PaymentStatus(status) => enrollment.payment_status == *status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_transitions() {
        use EnrollmentStatus::*;

        assert!(Pending.can_transition_to(Active));
        assert!(Pending.can_transition_to(Failed));
        assert!(Active.can_transition_to(Expired));
        assert!(Active.can_transition_to(Cancelled));
        assert!(Expired.can_transition_to(Cancelled));
        assert!(Active.can_transition_to(Active));
    }

    #[test]
    fn test_rejected_transitions() {
        use EnrollmentStatus::*;

        assert!(!Cancelled.can_transition_to(Active));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Failed.can_transition_to(Active));
        assert!(!Active.can_transition_to(Pending));
        assert!(!Expired.can_transition_to(Active));
        assert!(!Active.can_transition_to(Failed));
    }

    #[test]
    fn test_gateway_data_tagged_by_method() {
        let data: PaymentGatewayData = serde_json::from_value(serde_json::json!({
            "method": "midtrans",
            "orderId": "ORD-42",
            "transactionStatus": "settlement"
        }))
        .unwrap();

        assert_eq!(data.method(), PaymentMethod::Midtrans);
        assert_eq!(
            data,
            PaymentGatewayData::Midtrans {
                order_id: "ORD-42".to_string(),
                transaction_status: Some("settlement".to_string()),
                fraud_status: None,
            }
        );

        let unknown = serde_json::from_value::<PaymentGatewayData>(serde_json::json!({
            "method": "paypal",
            "orderId": "x"
        }));
        assert!(unknown.is_err());
    }
}
