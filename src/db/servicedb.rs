// db/servicedb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::servicemodel::{NewService, Service, ServicePatch};

#[async_trait]
pub trait ServiceExt {
    async fn get_services(&self) -> Result<Vec<Service>, sqlx::Error>;

    async fn get_service(&self, service_id: Uuid) -> Result<Option<Service>, sqlx::Error>;

    async fn create_service(&self, service: NewService) -> Result<Service, sqlx::Error>;

    async fn update_service(
        &self,
        service_id: Uuid,
        patch: ServicePatch,
    ) -> Result<Service, sqlx::Error>;

    /// Removes the service together with its plans.
    async fn delete_service(&self, service_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl ServiceExt for DBClient {
    async fn get_services(&self) -> Result<Vec<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>("SELECT * FROM services ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
    }

    async fn get_service(&self, service_id: Uuid) -> Result<Option<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(service_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_service(&self, service: NewService) -> Result<Service, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (name, description, emoji, is_new)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#
        )
        .bind(service.name)
        .bind(service.description)
        .bind(service.emoji)
        .bind(service.is_new)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_service(
        &self,
        service_id: Uuid,
        patch: ServicePatch,
    ) -> Result<Service, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                emoji = COALESCE($4, emoji),
                is_new = COALESCE($5, is_new),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(service_id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.emoji)
        .bind(patch.is_new)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_service(&self, service_id: Uuid) -> Result<(), sqlx::Error> {
        // service_plans.service_id cascades
        sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(service_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
