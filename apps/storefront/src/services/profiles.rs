// storefront/src/services/profiles.rs

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::Result as AppResult;
use crate::models::{Role, UserProfile};

#[instrument(skip(pool))]
pub async fn find_profile(pool: &PgPool, user_id: Uuid) -> AppResult<Option<UserProfile>> {
  let profile = sqlx::query_as("SELECT id, full_name, email, role, created_at FROM user_profiles WHERE id = $1")
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
  Ok(profile)
}

/// Users without a profile row are plain users.
pub async fn role_of(pool: &PgPool, user_id: Uuid) -> AppResult<Role> {
  Ok(find_profile(pool, user_id).await?.map(|p| p.role).unwrap_or(Role::User))
}

pub async fn count_users(pool: &PgPool) -> AppResult<i64> {
  let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles")
    .fetch_one(pool)
    .await?;
  Ok(count)
}
