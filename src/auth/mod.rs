use crate::state::AppState;
use axum::Router;

pub mod cookie;
pub mod dto;
pub mod extractor;
pub mod handlers;
pub mod repo;
pub mod service;
pub mod session;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
