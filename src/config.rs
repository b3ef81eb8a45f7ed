use serde::Deserialize;

const DEFAULT_NUTRITION_DATA_URL: &str =
    "https://raw.githubusercontent.com/MuhamadSaeed/nutrition-data/main/nutrition.json";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NutritionConfig {
    pub data_url: String,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` runs the report store in memory (local development only).
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub llm: LlmConfig,
    pub nutrition: NutritionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutrivex".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "nutrivex-users".into()),
        };
        let llm = LlmConfig {
            api_key: std::env::var("OPENAI_API_KEY")?,
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into())
                .trim_end_matches('/')
                .to_string(),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
        };
        let nutrition = NutritionConfig {
            data_url: std::env::var("NUTRITION_DATA_URL")
                .unwrap_or_else(|_| DEFAULT_NUTRITION_DATA_URL.into()),
            cache_ttl_secs: std::env::var("NUTRITION_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60 * 60),
        };
        Ok(Self {
            database_url,
            jwt,
            llm,
            nutrition,
        })
    }
}
