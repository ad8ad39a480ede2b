use thiserror::Error;
use uuid::Uuid;
use crate::{
    models::enrollmentmodel::{EnrollmentStatus, PaymentMethod},
    error::HttpError,
};
use axum::http::StatusCode;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("Access denied")]
    AccessDenied,

    #[error("Service {0} not found")]
    ServiceNotFound(Uuid),

    #[error("Service plan {0} not found")]
    PlanNotFound(Uuid),

    #[error("Plan {plan_id} does not belong to service {service_id}")]
    PlanNotBelongingToService { plan_id: Uuid, service_id: Uuid },

    #[error("Plan {0} is not active")]
    PlanInactive(Uuid),

    #[error("User is already enrolled in this service")]
    AlreadyEnrolled,

    #[error("Enrollment {0} not found")]
    EnrollmentNotFound(Uuid),

    #[error("Enrollment is already cancelled")]
    AlreadyCancelled,

    #[error("Enrollment cannot move from {} to {}", .from.to_str(), .to.to_str())]
    InvalidStatusTransition { from: EnrollmentStatus, to: EnrollmentStatus },

    #[error("Payment method {} does not match gateway data for {}", .method.to_str(), .data_method.to_str())]
    PaymentMethodMismatch { method: PaymentMethod, data_method: PaymentMethod },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Identity token rejected: {0}")]
    Identity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotAuthenticated
            | ServiceError::Identity(_) => StatusCode::UNAUTHORIZED,

            ServiceError::AccessDenied => StatusCode::FORBIDDEN,

            ServiceError::UserNotFound
            | ServiceError::ServiceNotFound(_)
            | ServiceError::PlanNotFound(_)
            | ServiceError::EnrollmentNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::PlanNotBelongingToService { .. }
            | ServiceError::PlanInactive(_)
            | ServiceError::InvalidStatusTransition { .. }
            | ServiceError::PaymentMethodMismatch { .. }
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::AlreadyEnrolled
            | ServiceError::AlreadyCancelled => StatusCode::CONFLICT,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Database(ref e) => {
                tracing::error!("database error: {}", e);
                HttpError::server_error("Server Error. Please try again later")
            }
            _ => HttpError::new(error.to_string(), error.status_code()),
        }
    }
}
