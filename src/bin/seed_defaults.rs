//! Seeds default recipes (no owner, visible to every user) from the external
//! catalog. Usage: `seed_defaults [count]`, count defaults to 20.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use hestia::config::AppConfig;
use hestia::import::client::{RecipeSource, SpoonacularClient};
use hestia::import::convert::convert;
use hestia::recipes::repo::Recipe;

const POPULAR_QUERIES: &[&str] = &[
    "pasta", "chicken", "dessert", "salad", "soup", "pizza", "bread", "cake",
];

const RESULTS_PER_QUERY: i64 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "hestia=info".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let count: usize = std::env::args()
        .nth(1)
        .map(|arg| arg.parse().context("count must be a number"))
        .transpose()?
        .unwrap_or(20);

    let config = AppConfig::from_env()?;
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;
    let source = SpoonacularClient::new(&config.spoonacular.base_url, &config.spoonacular.api_key);

    info!(count, "seeding default recipes");

    let mut added = 0usize;
    'queries: for query in POPULAR_QUERIES {
        if added >= count {
            break;
        }

        let summaries = match source.search(query, RESULTS_PER_QUERY, 0).await {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!(error = %e, query = %query, "search failed, skipping query");
                continue;
            }
        };

        for summary in summaries {
            if added >= count {
                break 'queries;
            }

            if Recipe::default_exists_for_source(&db, &format!("%{}%", summary.id)).await? {
                info!(source_id = summary.id, "default recipe already present, skipping");
                continue;
            }

            let new = match source.fetch(summary.id).await {
                Ok(full) => convert(full),
                Err(e) => {
                    warn!(error = %e, source_id = summary.id, "fetch failed, skipping");
                    continue;
                }
            };

            let stored = Recipe::create(&db, None, new).await?;
            info!(recipe_id = stored.id, title = %stored.title, "seeded default recipe");
            added += 1;
        }
    }

    info!(added, "seeding complete");
    Ok(())
}
