use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    db::Store,
    dtos::servicedtos::{CreateServiceDto, UpdateServiceDto},
    models::{servicemodel::Service, usermodel::User},
};

use super::{access::require_admin, error::ServiceError};

pub struct CatalogService {
    db_client: Arc<dyn Store>,
}

impl CatalogService {
    pub fn new(db_client: Arc<dyn Store>) -> Self {
        Self { db_client }
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, ServiceError> {
        Ok(self.db_client.get_services().await?)
    }

    pub async fn get_service(&self, service_id: Uuid) -> Result<Service, ServiceError> {
        self.db_client
            .get_service(service_id)
            .await?
            .ok_or(ServiceError::ServiceNotFound(service_id))
    }

    pub async fn create_service(
        &self,
        actor: &User,
        body: CreateServiceDto,
    ) -> Result<Service, ServiceError> {
        require_admin(actor)?;
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let service = self.db_client.create_service(body.into()).await?;
        tracing::info!("Service {} created by {}", service.id, actor.id);
        Ok(service)
    }

    pub async fn update_service(
        &self,
        actor: &User,
        service_id: Uuid,
        body: UpdateServiceDto,
    ) -> Result<Service, ServiceError> {
        require_admin(actor)?;
        body.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        self.get_service(service_id).await?;

        self.db_client
            .update_service(service_id, body.into())
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => ServiceError::ServiceNotFound(service_id),
                e => ServiceError::Database(e),
            })
    }

    /// Removes the service together with its plans. Enrollments keep their ids.
    pub async fn delete_service(&self, actor: &User, service_id: Uuid) -> Result<(), ServiceError> {
        require_admin(actor)?;
        self.get_service(service_id).await?;

        self.db_client.delete_service(service_id).await?;
        tracing::info!("Service {} deleted by {}", service_id, actor.id);
        Ok(())
    }
}
