use uuid::Uuid;

use crate::{db::Store, models::usermodel::User};

use super::error::ServiceError;

/// Resolves the caller from the subject of a verified backend token.
pub async fn resolve_current_user(
    db_client: &dyn Store,
    subject: Option<&str>,
) -> Result<User, ServiceError> {
    let subject = subject.ok_or(ServiceError::NotAuthenticated)?;
    let user_id = Uuid::parse_str(subject).map_err(|_| ServiceError::NotAuthenticated)?;

    db_client
        .get_user(user_id)
        .await?
        .ok_or(ServiceError::UserNotFound)
}

pub fn require_admin(user: &User) -> Result<(), ServiceError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::AccessDenied)
    }
}

pub fn ensure_owner_or_admin(user: &User, owner_id: Uuid) -> Result<(), ServiceError> {
    if user.id == owner_id || user.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{memorydb::MemoryStore, userdb::UserExt},
        models::usermodel::{UpsertUser, UserRole},
    };

    async fn seed(store: &MemoryStore, identity: &str, role: Option<UserRole>) -> User {
        store
            .upsert_user(UpsertUser {
                identity_id: identity.to_string(),
                email: format!("{}@jikiro.test", identity),
                name: None,
                phone: None,
                role,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_current_user() {
        let store = MemoryStore::new();
        let user = seed(&store, "idp|alice", None).await;

        let resolved = resolve_current_user(&store, Some(&user.id.to_string()))
            .await
            .unwrap();
        assert_eq!(resolved.id, user.id);

        assert!(matches!(
            resolve_current_user(&store, None).await,
            Err(ServiceError::NotAuthenticated)
        ));
        assert!(matches!(
            resolve_current_user(&store, Some("not-a-uuid")).await,
            Err(ServiceError::NotAuthenticated)
        ));
        assert!(matches!(
            resolve_current_user(&store, Some(&Uuid::new_v4().to_string())).await,
            Err(ServiceError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_admin_and_ownership_checks() {
        let store = MemoryStore::new();
        let admin = seed(&store, "idp|admin", Some(UserRole::Admin)).await;
        let alice = seed(&store, "idp|alice", None).await;
        let bob = seed(&store, "idp|bob", None).await;

        assert!(require_admin(&admin).is_ok());
        assert!(matches!(require_admin(&alice), Err(ServiceError::AccessDenied)));

        assert!(ensure_owner_or_admin(&alice, alice.id).is_ok());
        assert!(ensure_owner_or_admin(&admin, alice.id).is_ok());
        assert!(matches!(
            ensure_owner_or_admin(&bob, alice.id),
            Err(ServiceError::AccessDenied)
        ));
    }
}
