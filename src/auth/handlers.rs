use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, instrument, warn};

use crate::error::{is_unique_violation, AppError};
use crate::state::AppState;

use super::cookie;
use super::dto::{LoginRequest, PublicUser, RegisterRequest};
use super::extractor::AuthUser;
use super::repo::User;
use super::service::{hash_password, is_valid_email, verify_password};
use super::session::new_session_token;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<PublicUser>), AppError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() {
        return Err(AppError::InvalidInput("Username is required".into()));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::InvalidInput("Invalid email".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(AppError::InvalidInput("Password too short".into()));
    }

    // Ensure email is not taken
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;

    // The pre-check races with concurrent registrations; the unique index on
    // email is the authority.
    let user = match User::create(&state.db, &payload.username, &payload.email, &hash).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %payload.email, "email already registered");
            return Err(AppError::Conflict("Email already registered".into()));
        }
        Err(e) => return Err(AppError::Internal(e)),
    };

    let headers = start_session(&state, user.id).await?;
    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, headers, Json(public(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<PublicUser>), AppError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(user) => user,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(AppError::Unauthorized);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized);
    }

    let headers = start_session(&state, user.id).await?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok((headers, Json(public(user))))
}

#[instrument(skip(state, request_headers))]
pub async fn logout(
    State(state): State<AppState>,
    request_headers: HeaderMap,
) -> Result<(StatusCode, HeaderMap), AppError> {
    if let Some(token) = cookie::session_token(&request_headers) {
        state.sessions.delete(&token).await?;
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie::clear_session_cookie(state.config.dev_mode)
            .parse()
            .map_err(anyhow::Error::from)?,
    );
    info!("user logged out");
    Ok((StatusCode::NO_CONTENT, headers))
}

#[instrument(skip_all)]
pub async fn me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(public(user))
}

/// Creates a session and returns the Set-Cookie header carrying its token.
async fn start_session(state: &AppState, user_id: i64) -> Result<HeaderMap, AppError> {
    let token = new_session_token();
    let ttl = state.config.session.ttl_seconds;
    state.sessions.set(&token, user_id, ttl).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie::session_cookie(&token, ttl, state.config.dev_mode)
            .parse()
            .map_err(anyhow::Error::from)?,
    );
    Ok(headers)
}

fn public(user: User) -> PublicUser {
    PublicUser {
        id: user.id,
        username: user.username,
        email: user.email,
    }
}

#[cfg(test)]
mod me_tests {
    use super::*;

    #[test]
    fn test_me_response_serialization() {
        let response = PublicUser {
            id: 42,
            username: "cook".to_string(),
            email: "test@example.com".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("cook"));
        assert!(json.contains("id"));
    }
}
