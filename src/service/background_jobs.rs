// service/background_jobs.rs
use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::{service::enrollment_service::EnrollmentService, AppState};

/// Periodically expires active enrollments whose billing period has ended.
pub async fn start_enrollment_expiry_job(app_state: Arc<AppState>, every_secs: u64) {
    let mut interval = interval(Duration::from_secs(every_secs));

    let enrollment_service = EnrollmentService::new(
        app_state.db_client.clone(),
        app_state.env.default_currency.clone(),
    );

    loop {
        interval.tick().await;

        tracing::debug!("Running enrollment expiry job at {}", Utc::now());

        match enrollment_service.expire_due_enrollments(Utc::now()).await {
            Ok(0) => {}
            Ok(count) => tracing::info!("Enrollment expiry job: {} enrollments expired", count),
            Err(e) => tracing::error!("Enrollment expiry job failed: {}", e),
        }
    }
}
