use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

use super::cookie;
use super::repo::User;
use super::service::hash_password;

/// Resolved request identity. Recipe handlers take this extractor, so a
/// request never reaches them without a live session behind it.
///
/// The caller learns only "Not authenticated" whichever check failed; the
/// distinctions live in the logs.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.auth_bypass {
            return Ok(AuthUser(dev_identity(state).await?));
        }

        let token = cookie::session_token(&parts.headers).ok_or_else(|| {
            warn!("request without session cookie");
            AppError::Unauthorized
        })?;

        let user_id = match state.sessions.get(&token).await? {
            Some(id) => id,
            None => {
                warn!("unknown or expired session token");
                return Err(AppError::Unauthorized);
            }
        };

        match User::find_by_id(&state.db, user_id).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                warn!(user_id, "session points at a missing user");
                Err(AppError::Unauthorized)
            }
        }
    }
}

const DEV_EMAIL: &str = "dev@localhost";

/// Auto-provisioned identity for the dev bypass. The account gets a random
/// throwaway password so it stays unusable through the login endpoint.
async fn dev_identity(state: &AppState) -> Result<User, AppError> {
    if let Some(user) = User::find_by_email(&state.db, DEV_EMAIL).await? {
        return Ok(user);
    }
    warn!("auth bypass active, provisioning dev user");
    let hash = hash_password(&uuid::Uuid::new_v4().to_string())?;
    let user = User::create(&state.db, "dev", DEV_EMAIL, &hash).await?;
    Ok(user)
}
