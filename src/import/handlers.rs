use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::recipes::dto::{default_limit, Pagination, RecipeResponse};
use crate::recipes::repo::Recipe;
use crate::state::AppState;

use super::client::SourceRecipeSummary;
use super::convert::convert;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/import/search", get(search_source))
        .route("/import/:id", post(import_recipe))
}

#[derive(Debug, Deserialize)]
pub struct ImportSearchParams {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Search the external catalog. Returns summaries only; the full recipe is
/// pulled when the user decides to import one.
#[instrument(skip(state, _user))]
pub async fn search_source(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(params): Query<ImportSearchParams>,
) -> Result<Json<Vec<SourceRecipeSummary>>, AppError> {
    Pagination {
        limit: params.limit,
        offset: params.offset,
    }
    .validate()?;

    let query = params.q.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Search query is required".into()));
    }

    let results = state.importer.search(query, params.limit, params.offset).await?;
    Ok(Json(results))
}

/// Fetch a recipe from the external catalog and store it for the caller.
#[instrument(skip(state, user))]
pub async fn import_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<RecipeResponse>), AppError> {
    let source = state.importer.fetch(id).await.map_err(|e| {
        let status = e
            .downcast_ref::<reqwest::Error>()
            .and_then(reqwest::Error::status);
        if status == Some(reqwest::StatusCode::NOT_FOUND) {
            AppError::NotFound("Recipe")
        } else {
            AppError::Internal(e)
        }
    })?;

    let recipe = Recipe::create(&state.db, Some(user.id), convert(source)).await?;
    info!(recipe_id = recipe.id, source_id = id, user_id = user.id, "recipe imported");
    Ok((StatusCode::CREATED, Json(recipe.into())))
}
