// db/userdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::{UpsertUser, User, UserRole};

/// Lowercased `%needle%` with LIKE metacharacters escaped, so search is a plain substring match.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
pub trait UserExt {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(
        &self,
        role: Option<UserRole>,
        search: Option<&str>,
    ) -> Result<Vec<User>, sqlx::Error>;

    async fn upsert_user(&self, user: UpsertUser) -> Result<User, sqlx::Error>;

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_role(&self, user_id: Uuid, role: UserRole) -> Result<User, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) ORDER BY created_at LIMIT 1"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_users(
        &self,
        role: Option<UserRole>,
        search: Option<&str>,
    ) -> Result<Vec<User>, sqlx::Error> {
        let pattern = search.map(contains_pattern);

        sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
            AND (
                $2::text IS NULL
                OR LOWER(email) LIKE $2 ESCAPE '\'
                OR LOWER(COALESCE(name, '')) LIKE $2 ESCAPE '\'
            )
            ORDER BY created_at DESC
            "#
        )
        .bind(role)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (identity_id, email, name, phone, role)
            VALUES ($1, $2, $3, $4, COALESCE($5::user_role, 'user'::user_role))
            ON CONFLICT (identity_id) DO UPDATE
            SET email = EXCLUDED.email,
                name = COALESCE($3, users.name),
                phone = COALESCE($4, users.phone),
                role = COALESCE($5::user_role, users.role),
                updated_at = NOW()
            RETURNING *
            "#
        )
        .bind(user.identity_id)
        .bind(user.email)
        .bind(user.name)
        .bind(user.phone)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(user_id)
        .bind(name)
        .bind(phone)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_role(&self, user_id: Uuid, role: UserRole) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }
}
