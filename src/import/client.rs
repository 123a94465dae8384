use axum::async_trait;
use serde::{Deserialize, Serialize};

/// Summary row returned by the third-party search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecipeSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SourceRecipeSummary>,
}

/// Third-party recipe payload from the information endpoint. Only the fields
/// the adapter consumes are modeled; the rest of the payload is dropped at
/// deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceRecipe {
    pub title: String,
    pub summary: Option<String>,
    pub extended_ingredients: Vec<SourceIngredient>,
    pub analyzed_instructions: Vec<SourceInstructionGroup>,
    pub preparation_minutes: Option<i32>,
    pub cooking_minutes: Option<i32>,
    pub ready_in_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub source_url: Option<String>,
    pub spoonacular_source_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceIngredient {
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceInstructionGroup {
    pub steps: Vec<SourceInstructionStep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceInstructionStep {
    pub step: String,
}

/// Boundary to the external recipe catalog. Injected so handlers and the
/// seeder can be driven by a stub; fetching never happens in the adapter.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn search(
        &self,
        query: &str,
        number: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<SourceRecipeSummary>>;

    async fn fetch(&self, id: i64) -> anyhow::Result<SourceRecipe>;
}

pub struct SpoonacularClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SpoonacularClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    async fn search(
        &self,
        query: &str,
        number: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<SourceRecipeSummary>> {
        let url = format!("{}/recipes/complexSearch", self.base_url);
        let number = number.to_string();
        let offset = offset.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("query", query),
                ("number", number.as_str()),
                ("offset", offset.as_str()),
                // Full details are fetched separately per recipe.
                ("addRecipeInformation", "false"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        Ok(body.results)
    }

    async fn fetch(&self, id: i64) -> anyhow::Result<SourceRecipe> {
        let url = format!("{}/recipes/{}/information", self.base_url, id);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("includeNutrition", "false"),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_recipe_reads_camel_case_payloads() {
        let payload = serde_json::json!({
            "title": "Garlic Pasta",
            "summary": "Quick <b>weeknight</b> pasta.",
            "extendedIngredients": [
                {"name": "spaghetti", "amount": 200.0, "unit": "g"},
                {"name": "garlic"}
            ],
            "analyzedInstructions": [
                {"steps": [{"step": "Boil pasta."}, {"step": "Add garlic."}]}
            ],
            "readyInMinutes": 20,
            "servings": 2,
            "sourceUrl": "https://example.com/garlic-pasta"
        });

        let recipe: SourceRecipe = serde_json::from_value(payload).unwrap();
        assert_eq!(recipe.title, "Garlic Pasta");
        assert_eq!(recipe.extended_ingredients.len(), 2);
        assert_eq!(recipe.extended_ingredients[1].name, "garlic");
        assert_eq!(recipe.extended_ingredients[1].amount, None);
        assert_eq!(recipe.analyzed_instructions[0].steps.len(), 2);
        assert_eq!(recipe.ready_in_minutes, Some(20));
        assert_eq!(recipe.preparation_minutes, None);
        assert_eq!(
            recipe.source_url.as_deref(),
            Some("https://example.com/garlic-pasta")
        );
    }

    #[test]
    fn search_results_tolerate_missing_fields() {
        let payload = serde_json::json!({
            "results": [{"id": 7, "title": "Soup"}]
        });
        let body: SearchResponse = serde_json::from_value(payload).unwrap();
        assert_eq!(body.results.len(), 1);
        assert_eq!(body.results[0].image, None);
    }
}
