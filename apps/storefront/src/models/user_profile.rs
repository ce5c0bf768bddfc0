// storefront/src/models/user_profile.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "user_role_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Admin,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
  pub id: Uuid,
  pub full_name: String,
  pub email: String,
  pub role: Role,
  pub created_at: DateTime<Utc>,
}
