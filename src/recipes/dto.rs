use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;

use super::repo::{IngredientEntry, Recipe};

/// Wire shape of a recipe. Timestamps go out as RFC 3339 so the frontend can
/// hand them straight to Date().
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<IngredientEntry>,
    pub instructions: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub source_url: Option<String>,
    pub user_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            ingredients: recipe.ingredients.0,
            instructions: recipe.instructions,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            source_url: recipe.source_url,
            user_id: recipe.user_id,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub(crate) fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Boundary rule for every paged endpoint: limit in [1,100], offset >= 0.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=100).contains(&self.limit) {
            return Err(AppError::InvalidInput(
                "limit must be between 1 and 100".into(),
            ));
        }
        if self.offset < 0 {
            return Err(AppError::InvalidInput("offset must be non-negative".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct TextSearchParams {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl TextSearchParams {
    pub fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IngredientSearchRequest {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub match_all: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl IngredientSearchRequest {
    pub fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::types::Json;

    use super::*;

    #[test]
    fn pagination_bounds_are_enforced() {
        assert!(Pagination { limit: 1, offset: 0 }.validate().is_ok());
        assert!(Pagination { limit: 100, offset: 50 }.validate().is_ok());
        assert!(Pagination { limit: 0, offset: 0 }.validate().is_err());
        assert!(Pagination { limit: 101, offset: 0 }.validate().is_err());
        assert!(Pagination { limit: 20, offset: -1 }.validate().is_err());
    }

    #[test]
    fn ingredient_search_defaults() {
        let body: IngredientSearchRequest =
            serde_json::from_str(r#"{"ingredients":["flour"]}"#).unwrap();
        assert!(!body.match_all);
        assert_eq!(body.limit, 20);
        assert_eq!(body.offset, 0);
    }

    #[test]
    fn response_serializes_ingredients_inline_and_rfc3339_timestamps() {
        let created = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let response = RecipeResponse::from(Recipe {
            id: 5,
            title: "Pancakes".into(),
            description: None,
            ingredients: Json(vec![IngredientEntry {
                name: "flour".into(),
                quantity: Some("2".into()),
                unit: Some("cups".into()),
            }]),
            instructions: "Mix.\nFry.".into(),
            prep_time: Some(10),
            cook_time: Some(15),
            servings: Some(4),
            source_url: None,
            user_id: Some(1),
            created_at: created,
            updated_at: created,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["ingredients"][0]["name"], "flour");
        assert_eq!(json["created_at"], "2023-11-14T22:13:20Z");
    }
}
