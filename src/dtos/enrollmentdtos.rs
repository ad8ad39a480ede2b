use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::enrollmentmodel::{
    Enrollment, EnrollmentFilter, EnrollmentStatus, PaymentGatewayData, PaymentMethod, PaymentStatus,
};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentDto {
    pub service_id: Uuid,
    pub plan_id: Uuid,
    pub payment_method: Option<PaymentMethod>,

    #[validate(length(min = 1, max = 255, message = "Transaction id must be between 1-255 characters"))]
    pub transaction_id: Option<String>,

    pub payment_gateway_data: Option<PaymentGatewayData>,

    /// Activates immediately with payment status `test`, skipping payment.
    pub is_test_mode: Option<bool>,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnrollmentStatusDto {
    pub status: Option<EnrollmentStatus>,
    pub payment_status: Option<PaymentStatus>,

    #[validate(length(min = 1, max = 255, message = "Transaction id must be between 1-255 characters"))]
    pub transaction_id: Option<String>,

    pub payment_gateway_data: Option<PaymentGatewayData>,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelEnrollmentDto {
    #[validate(length(max = 500, message = "Cancel reason must be at most 500 characters"))]
    pub cancel_reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckEnrollmentQueryDto {
    pub service_id: Uuid,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentFilterQueryDto {
    pub status: Option<EnrollmentStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl EnrollmentFilterQueryDto {
    pub fn into_filter(self) -> Result<EnrollmentFilter, String> {
        match (self.status, self.payment_status) {
            (Some(_), Some(_)) => {
                Err("Filter by status or paymentStatus, not both".to_string())
            }
            (Some(status), None) => Ok(EnrollmentFilter::Status(status)),
            (None, Some(payment_status)) => Ok(EnrollmentFilter::PaymentStatus(payment_status)),
            (None, None) => Ok(EnrollmentFilter::All),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentCheckDto {
    pub is_enrolled: bool,
    pub enrollment: Option<Enrollment>,
}
