use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpoonacularConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub cors_origins: Vec<String>,
    pub dev_mode: bool,
    /// Resolves every request to a fixed dev identity. Only honored when
    /// `dev_mode` is also set; never reachable in a production configuration.
    pub auth_bypass: bool,
    pub session: SessionConfig,
    pub spoonacular: SpoonacularConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379/0".into());
        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );
        let dev_mode = env_flag("DEV_MODE");
        let auth_bypass = dev_mode && env_flag("DEV_AUTH_BYPASS");
        let session = SessionConfig {
            ttl_seconds: std::env::var("SESSION_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60 * 60 * 24),
        };
        let spoonacular = SpoonacularConfig {
            api_key: std::env::var("SPOONACULAR_API_KEY").unwrap_or_default(),
            base_url: std::env::var("SPOONACULAR_BASE_URL")
                .unwrap_or_else(|_| "https://api.spoonacular.com".into()),
        };
        Ok(Self {
            database_url,
            redis_url,
            cors_origins,
            dev_mode,
            auth_bypass,
            session,
            spoonacular,
        })
    }
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| {
            let v = v.trim().to_lowercase();
            v == "true" || v == "1"
        })
        .unwrap_or(false)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        let origins = parse_origins("http://localhost:5173, https://hestia.app ,");
        assert_eq!(
            origins,
            vec![
                "http://localhost:5173".to_string(),
                "https://hestia.app".to_string()
            ]
        );
    }

    #[test]
    fn single_origin_passes_through() {
        assert_eq!(
            parse_origins("http://localhost:5173"),
            vec!["http://localhost:5173".to_string()]
        );
    }
}
