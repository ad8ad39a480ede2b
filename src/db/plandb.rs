// db/plandb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::planmodel::{NewServicePlan, PlanPatch, ServicePlan};

#[async_trait]
pub trait PlanExt {
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<ServicePlan>, sqlx::Error>;

    /// Plans of a service ordered by `sort_order`, then creation time.
    async fn get_service_plans(
        &self,
        service_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<ServicePlan>, sqlx::Error>;

    async fn create_plan(&self, plan: NewServicePlan) -> Result<ServicePlan, sqlx::Error>;

    async fn update_plan(&self, plan_id: Uuid, patch: PlanPatch) -> Result<ServicePlan, sqlx::Error>;

    async fn delete_plan(&self, plan_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl PlanExt for DBClient {
    async fn get_plan(&self, plan_id: Uuid) -> Result<Option<ServicePlan>, sqlx::Error> {
        sqlx::query_as::<_, ServicePlan>("SELECT * FROM service_plans WHERE id = $1")
            .bind(plan_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_service_plans(
        &self,
        service_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<ServicePlan>, sqlx::Error> {
        sqlx::query_as::<_, ServicePlan>(
            r#"
            SELECT * FROM service_plans
            WHERE service_id = $1
            AND ($2 = FALSE OR is_active = TRUE)
            ORDER BY sort_order ASC, created_at ASC
            "#
        )
        .bind(service_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_plan(&self, plan: NewServicePlan) -> Result<ServicePlan, sqlx::Error> {
        sqlx::query_as::<_, ServicePlan>(
            r#"
            INSERT INTO service_plans
            (service_id, plan_name, description, price, billing_period, items, is_popular, sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
            RETURNING *
            "#
        )
        .bind(plan.service_id)
        .bind(plan.plan_name)
        .bind(plan.description)
        .bind(plan.price)
        .bind(plan.billing_period)
        .bind(plan.items)
        .bind(plan.is_popular)
        .bind(plan.sort_order)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_plan(&self, plan_id: Uuid, patch: PlanPatch) -> Result<ServicePlan, sqlx::Error> {
        sqlx::query_as::<_, ServicePlan>(
            r#"
            UPDATE service_plans
            SET plan_name = COALESCE($2, plan_name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                billing_period = COALESCE($5, billing_period),
                items = COALESCE($6, items),
                is_popular = COALESCE($7, is_popular),
                sort_order = COALESCE($8, sort_order),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(plan_id)
        .bind(patch.plan_name)
        .bind(patch.description)
        .bind(patch.price)
        .bind(patch.billing_period)
        .bind(patch.items)
        .bind(patch.is_popular)
        .bind(patch.sort_order)
        .bind(patch.is_active)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_plan(&self, plan_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM service_plans WHERE id = $1")
            .bind(plan_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
