use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::auth::session::{RedisSessionStore, SessionStore};
use crate::config::AppConfig;
use crate::import::client::{RecipeSource, SpoonacularClient};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub sessions: Arc<dyn SessionStore>,
    pub importer: Arc<dyn RecipeSource>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let sessions = Arc::new(
            RedisSessionStore::connect(&config.redis_url)
                .await
                .context("connect to session store")?,
        ) as Arc<dyn SessionStore>;

        let importer = Arc::new(SpoonacularClient::new(
            &config.spoonacular.base_url,
            &config.spoonacular.api_key,
        )) as Arc<dyn RecipeSource>;

        Ok(Self {
            db,
            config,
            sessions,
            importer,
        })
    }
}
