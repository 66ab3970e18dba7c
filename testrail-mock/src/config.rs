use std::env;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub seed_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4002".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./.db/testrail.db".to_string()),
            seed_path: env::var("SEED_PATH")
                .unwrap_or_else(|_| "seed/sample_testcases.json".to_string()),
        }
    }
}
