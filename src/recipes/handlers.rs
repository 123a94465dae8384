use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, instrument};

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

use super::dto::{IngredientSearchRequest, Pagination, RecipeResponse, TextSearchParams};
use super::matcher;
use super::repo::{NewRecipe, Recipe};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/search", get(search_recipes))
        .route("/recipes/search/ingredients", post(search_by_ingredients))
        .route("/recipes/:id", get(get_recipe).delete(delete_recipe))
}

#[instrument(skip(state, user))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    page.validate()?;
    let recipes = Recipe::list_visible(&state.db, user.id, page.limit, page.offset).await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

/// Search recipes by title or description.
#[instrument(skip(state, user))]
pub async fn search_recipes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<TextSearchParams>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    params.page().validate()?;
    let query = params.q.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Search query is required".into()));
    }

    let recipes =
        Recipe::search_text(&state.db, user.id, query, params.limit, params.offset).await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

/// Search recipes by ingredients, ranked by number of matching names. The
/// whole visible collection is fetched and scanned in process; see the
/// matcher module for the rules.
#[instrument(skip(state, user, body))]
pub async fn search_by_ingredients(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<IngredientSearchRequest>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    body.page().validate()?;
    let query = matcher::normalize_query(&body.ingredients)?;

    let candidates = Recipe::all_visible(&state.db, user.id).await?;
    let ranked = matcher::rank(candidates, &query, body.match_all, body.limit, body.offset);

    info!(
        terms = query.len(),
        match_all = body.match_all,
        results = ranked.len(),
        "ingredient search"
    );
    Ok(Json(ranked.into_iter().map(RecipeResponse::from).collect()))
}

#[instrument(skip(state, user))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<RecipeResponse>, AppError> {
    let recipe = Recipe::find_visible(&state.db, id, user.id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;
    Ok(Json(recipe.into()))
}

#[instrument(skip(state, user, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(mut body): Json<NewRecipe>,
) -> Result<(StatusCode, Json<RecipeResponse>), AppError> {
    body.title = body.title.trim().to_string();
    if body.title.is_empty() {
        return Err(AppError::InvalidInput("Title is required".into()));
    }

    let recipe = Recipe::create(&state.db, Some(user.id), body).await?;
    info!(recipe_id = recipe.id, user_id = user.id, "recipe created");
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

#[instrument(skip(state, user))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    // Not-owned and not-there both come back as 404.
    if !Recipe::delete_owned(&state.db, id, user.id).await? {
        return Err(AppError::NotFound("Recipe"));
    }
    info!(recipe_id = id, user_id = user.id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
