use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::Store,
    dtos::userdtos::UpdateUserProfileDto,
    models::usermodel::{UpsertUser, User, UserRole},
};

use super::{access::require_admin, error::ServiceError, identity::Principal};

pub struct UserService {
    db_client: Arc<dyn Store>,
    bootstrap_admin_emails: Vec<String>,
}

impl UserService {
    pub fn new(db_client: Arc<dyn Store>, bootstrap_admin_emails: Vec<String>) -> Self {
        Self {
            db_client,
            bootstrap_admin_emails,
        }
    }

    /// Idempotent create-or-update keyed by the identity subject.
    pub async fn upsert_user(&self, user: UpsertUser) -> Result<User, ServiceError> {
        if user.identity_id.trim().is_empty() {
            return Err(ServiceError::Validation("Identity id is required".to_string()));
        }
        if user.email.trim().is_empty() {
            return Err(ServiceError::Validation("Email is required".to_string()));
        }

        Ok(self.db_client.upsert_user(user).await?)
    }

    /// Maps a verified principal onto its local user, promoting bootstrap admins.
    pub async fn sign_in(&self, principal: Principal) -> Result<User, ServiceError> {
        let role = self
            .bootstrap_admin_emails
            .iter()
            .any(|email| *email == principal.email.to_lowercase())
            .then_some(UserRole::Admin);

        let user = self
            .upsert_user(UpsertUser {
                identity_id: principal.subject,
                email: principal.email,
                name: principal.name,
                phone: principal.phone,
                role,
            })
            .await?;

        tracing::info!("User {} signed in with role {}", user.id, user.role.to_str());
        Ok(user)
    }

    /// Self-service profile edit. Only name and phone are writable here.
    pub async fn update_profile(
        &self,
        actor: &User,
        body: UpdateUserProfileDto,
    ) -> Result<User, ServiceError> {
        self.db_client
            .update_user_profile(actor.id, body.name, body.phone)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => ServiceError::UserNotFound,
                e => ServiceError::Database(e),
            })
    }

    pub async fn list_users(
        &self,
        actor: &User,
        role: Option<UserRole>,
        search: Option<&str>,
    ) -> Result<Vec<User>, ServiceError> {
        require_admin(actor)?;

        let search = search.map(str::trim).filter(|s| !s.is_empty());
        Ok(self.db_client.get_users(role, search).await?)
    }

    pub async fn get_user_by_email(
        &self,
        actor: &User,
        email: &str,
    ) -> Result<Option<User>, ServiceError> {
        require_admin(actor)?;

        Ok(self
            .db_client
            .get_user_by_email(&email.trim().to_lowercase())
            .await?)
    }

    pub async fn update_user_role(
        &self,
        actor: &User,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<User, ServiceError> {
        require_admin(actor)?;

        if self.db_client.get_user(user_id).await?.is_none() {
            return Err(ServiceError::UserNotFound);
        }

        let user = self.db_client.update_user_role(user_id, role).await?;
        tracing::info!(
            "Admin {} changed role of user {} to {}",
            actor.id,
            user.id,
            role.to_str()
        );
        Ok(user)
    }
}
