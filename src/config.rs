use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Hard cap on the inclusive span of a single slot-generation run.
    pub max_generation_days: i64,
    /// Currency that calculated package prices are derived from.
    pub default_currency: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            max_generation_days: env::var("MAX_GENERATION_DAYS")
                .unwrap_or_else(|_| "365".to_string())
                .parse()
                .expect("MAX_GENERATION_DAYS must be a number"),
            default_currency: env::var("DEFAULT_CURRENCY").unwrap_or_else(|_| "USD".to_string()),
        }
    }
}
