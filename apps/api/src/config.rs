use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Path to the distilled salary model file.
    pub model_path: String,
    /// Optional override for the builtin currency table.
    pub currency_table_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| "model/salary_model.json".to_string()),
            currency_table_path: std::env::var("CURRENCY_TABLE_PATH").ok(),
        })
    }
}
