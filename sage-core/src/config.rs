use anyhow::{Context, Result};

/// Default chat model used when SAGE_MODEL env var is not set
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Default listen address for the web server
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Default number of prior turns kept per conversation
pub const DEFAULT_MEMORY_WINDOW: usize = 20;

/// Application configuration from environment
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub model: String,
    pub addr: String,
    pub memory_window: usize,
}

impl Config {
    /// Load configuration from .env file and environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Not an error if .env is missing

        let openrouter_api_key =
            std::env::var("OPENROUTER_API_KEY").context("OPENROUTER_API_KEY not set")?;

        let model = std::env::var("SAGE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let addr = std::env::var("SAGE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

        let memory_window = std::env::var("SAGE_MEMORY_WINDOW")
            .unwrap_or_else(|_| DEFAULT_MEMORY_WINDOW.to_string())
            .parse()
            .context("Invalid SAGE_MEMORY_WINDOW")?;

        Ok(Self {
            openrouter_api_key,
            model,
            addr,
            memory_window,
        })
    }
}
