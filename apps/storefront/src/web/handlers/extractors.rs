// storefront/src/web/handlers/extractors.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use cartsync::IdentityId;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Role;
use crate::services::profiles;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "X-User-ID";

/// Identity of the caller, taken from the `X-User-ID` header. Session
/// issuing lives outside this service.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

impl AuthenticatedUser {
  pub fn identity(&self) -> IdentityId {
    IdentityId(self.user_id)
  }
}

fn user_id_from(req: &HttpRequest) -> Result<Uuid, AppError> {
  req
    .headers()
    .get(USER_ID_HEADER)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| Uuid::parse_str(value).ok())
    .ok_or_else(|| {
      warn!("Missing or invalid {} header.", USER_ID_HEADER);
      AppError::Auth(format!(
        "User authentication required. Missing or invalid {} header.",
        USER_ID_HEADER
      ))
    })
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(user_id_from(req).map(|user_id| AuthenticatedUser { user_id }))
  }
}

/// An authenticated caller whose profile carries the admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser {
  pub user_id: Uuid,
}

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let user_id = user_id_from(req);
    let app_state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
      let user_id = user_id?;
      let app_state = app_state.ok_or_else(|| AppError::Internal("Application state not configured.".to_string()))?;

      match profiles::role_of(&app_state.db_pool, user_id).await? {
        Role::Admin => Ok(AdminUser { user_id }),
        Role::User => {
          warn!(%user_id, "Non-admin attempted an admin operation.");
          Err(AppError::Forbidden("Admin access required.".to_string()))
        }
      }
    })
  }
}
