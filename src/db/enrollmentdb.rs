// db/enrollmentdb.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::enrollmentmodel::{
    Enrollment, EnrollmentFilter, EnrollmentPatch, EnrollmentStatus, NewEnrollment,
};

#[async_trait]
pub trait EnrollmentExt {
    async fn get_enrollment(&self, enrollment_id: Uuid) -> Result<Option<Enrollment>, sqlx::Error>;

    async fn get_user_enrollments(&self, user_id: Uuid) -> Result<Vec<Enrollment>, sqlx::Error>;

    async fn get_active_enrollment(
        &self,
        user_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<Enrollment>, sqlx::Error>;

    async fn get_enrollments(&self, filter: EnrollmentFilter) -> Result<Vec<Enrollment>, sqlx::Error>;

    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment, sqlx::Error>;

    async fn update_enrollment(
        &self,
        enrollment_id: Uuid,
        patch: EnrollmentPatch,
    ) -> Result<Enrollment, sqlx::Error>;

    /// Marks active enrollments whose end date is before `now` as expired.
    async fn expire_enrollments(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl EnrollmentExt for DBClient {
    async fn get_enrollment(&self, enrollment_id: Uuid) -> Result<Option<Enrollment>, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>("SELECT * FROM enrollments WHERE id = $1")
            .bind(enrollment_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_user_enrollments(&self, user_id: Uuid) -> Result<Vec<Enrollment>, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE user_id = $1 ORDER BY created_at DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_active_enrollment(
        &self,
        user_id: Uuid,
        service_id: Uuid,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT * FROM enrollments
            WHERE user_id = $1 AND service_id = $2 AND status = 'active'
            LIMIT 1
            "#
        )
        .bind(user_id)
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_enrollments(&self, filter: EnrollmentFilter) -> Result<Vec<Enrollment>, sqlx::Error> {
        match filter {
            EnrollmentFilter::All => {
                sqlx::query_as::<_, Enrollment>("SELECT * FROM enrollments ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await
            }
            EnrollmentFilter::Status(status) => {
                sqlx::query_as::<_, Enrollment>(
                    "SELECT * FROM enrollments WHERE status = $1 ORDER BY created_at DESC"
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await
            }
            EnrollmentFilter::PaymentStatus(payment_status) => {
                sqlx::query_as::<_, Enrollment>(
                    "SELECT * FROM enrollments WHERE payment_status = $1 ORDER BY created_at DESC"
                )
                .bind(payment_status)
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<Enrollment, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments
            (user_id, service_id, plan_id, status, payment_status, payment_method,
             transaction_id, payment_gateway_data, amount, currency, billing_period,
             start_date, end_date, next_billing_date, auto_renew, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#
        )
        .bind(enrollment.user_id)
        .bind(enrollment.service_id)
        .bind(enrollment.plan_id)
        .bind(enrollment.status)
        .bind(enrollment.payment_status)
        .bind(enrollment.payment_method)
        .bind(enrollment.transaction_id)
        .bind(enrollment.payment_gateway_data.map(Json))
        .bind(enrollment.amount)
        .bind(enrollment.currency)
        .bind(enrollment.billing_period)
        .bind(enrollment.start_date)
        .bind(enrollment.end_date)
        .bind(enrollment.next_billing_date)
        .bind(enrollment.auto_renew)
        .bind(enrollment.notes)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_enrollment(
        &self,
        enrollment_id: Uuid,
        patch: EnrollmentPatch,
    ) -> Result<Enrollment, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            UPDATE enrollments
            SET status = COALESCE($2, status),
                payment_status = COALESCE($3, payment_status),
                payment_method = COALESCE($4, payment_method),
                transaction_id = COALESCE($5, transaction_id),
                payment_gateway_data = COALESCE($6, payment_gateway_data),
                auto_renew = COALESCE($7, auto_renew),
                cancelled_at = COALESCE($8, cancelled_at),
                cancel_reason = COALESCE($9, cancel_reason),
                notes = COALESCE($10, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(enrollment_id)
        .bind(patch.status)
        .bind(patch.payment_status)
        .bind(patch.payment_method)
        .bind(patch.transaction_id)
        .bind(patch.payment_gateway_data.map(Json))
        .bind(patch.auto_renew)
        .bind(patch.cancelled_at)
        .bind(patch.cancel_reason)
        .bind(patch.notes)
        .fetch_one(&self.pool)
        .await
    }

    async fn expire_enrollments(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE enrollments
            SET status = $2, updated_at = NOW()
            WHERE status = 'active'
            AND end_date IS NOT NULL
            AND end_date < $1
            "#
        )
        .bind(now)
        .bind(EnrollmentStatus::Expired)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
