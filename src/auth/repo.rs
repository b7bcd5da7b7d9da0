use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{NewUser, ProfileChanges, User};
use crate::store::{PgStore, StoreResult};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with a unique violation on `users_email_key` when the email is taken.
    async fn insert_user(&self, new: NewUser) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> StoreResult<Option<User>>;
}

const USER_COLUMNS: &str = "id, email, password_hash, name, university, skills, photo_key, created_at";

#[async_trait]
impl UserRepo for PgStore {
    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, university, skills)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.name)
        .bind(&new.university)
        .bind(&new.skills)
        .fetch_one(self.pool())
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> StoreResult<Option<User>> {
        let set_university = changes.university.is_some();
        let university = changes.university.flatten();
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name       = COALESCE($2, name),
                   university = CASE WHEN $3 THEN $4 ELSE university END,
                   skills     = COALESCE($5, skills),
                   photo_key  = COALESCE($6, photo_key)
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(set_university)
        .bind(&university)
        .bind(&changes.skills)
        .bind(&changes.photo_key)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }
}
