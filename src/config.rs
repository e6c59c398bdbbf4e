use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub mongo_uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub api_url: String,
    pub api_key: String,
    pub template_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "7999".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            storage: StorageConfig {
                mongo_uri: env::var("MONGO_URI").context("MONGO_URI must be set")?,
                database: env::var("MONGO_DATABASE")
                    .unwrap_or_else(|_| "clipvault".to_string()),
            },
            render: RenderConfig {
                api_url: env::var("RENDER_API_URL")
                    .unwrap_or_else(|_| "https://api.creatomate.com/v1/renders".to_string()),
                api_key: env::var("CREATOMATE_API_KEY").unwrap_or_default(),
                template_id: env::var("CREATOMATE_TEMPLATE_ID").unwrap_or_default(),
            },
        })
    }
}
