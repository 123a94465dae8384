use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// One entry in a recipe's ingredient list. Embedded in the recipes row as
/// JSONB; entries have no identity or lifecycle of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Json<Vec<IngredientEntry>>,
    pub instructions: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub source_url: Option<String>,
    /// None marks a default recipe, readable by every user and owned by none.
    pub user_id: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fields of a recipe before the database assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientEntry>,
    pub instructions: String,
    #[serde(default)]
    pub prep_time: Option<i32>,
    #[serde(default)]
    pub cook_time: Option<i32>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub source_url: Option<String>,
}

const RECIPE_COLUMNS: &str = r#"
    id, title, description, ingredients, instructions,
    prep_time, cook_time, servings, source_url, user_id,
    created_at, updated_at
"#;

impl Recipe {
    /// Every recipe the user may see: their own plus the default ones. This
    /// is the candidate set the ingredient matcher scans.
    pub async fn all_visible(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            WHERE user_id = $1 OR user_id IS NULL
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_visible(
        db: &PgPool,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            WHERE user_id = $1 OR user_id IS NULL
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Case-insensitive search on title and description.
    pub async fn search_text(
        db: &PgPool,
        user_id: i64,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Recipe>> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            WHERE (user_id = $1 OR user_id IS NULL)
              AND (title ILIKE $2 OR description ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(user_id)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// A recipe that is absent and one owned by somebody else look the same
    /// from here: both come back as None.
    pub async fn find_visible(
        db: &PgPool,
        id: i64,
        user_id: i64,
    ) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            WHERE id = $1 AND (user_id = $2 OR user_id IS NULL)
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Insert a recipe. `owner` of None stores a default recipe.
    pub async fn create(
        db: &PgPool,
        owner: Option<i64>,
        new: NewRecipe,
    ) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes
                (title, description, ingredients, instructions,
                 prep_time, cook_time, servings, source_url, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(new.title)
        .bind(new.description)
        .bind(Json(new.ingredients))
        .bind(new.instructions)
        .bind(new.prep_time)
        .bind(new.cook_time)
        .bind(new.servings)
        .bind(new.source_url)
        .bind(owner)
        .fetch_one(db)
        .await?;
        Ok(recipe)
    }

    /// Delete a recipe the user owns. Default recipes have no owner and are
    /// not deletable through this path.
    pub async fn delete_owned(db: &PgPool, id: i64, user_id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM recipes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a default recipe already carries this source id in its URL.
    /// Keeps the seeder from importing the same recipe twice.
    pub async fn default_exists_for_source(db: &PgPool, pattern: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM recipes
                WHERE user_id IS NULL AND source_url LIKE $1
            )
            "#,
        )
        .bind(pattern)
        .fetch_one(db)
        .await?;
        Ok(exists)
    }
}
