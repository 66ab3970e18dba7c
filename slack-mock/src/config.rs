use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Set MOCK_AUTH_REQUIRED=false to disable the bearer gate entirely.
    pub auth_required: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4003".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./.db/slack.db".to_string()),
            auth_required: env::var("MOCK_AUTH_REQUIRED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
        }
    }
}
