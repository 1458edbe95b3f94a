use anyhow::Result;
use serde::Deserialize;
use std::{collections::HashMap, time::Duration};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub image_model: String,
    pub image_size: String,
    pub image_quality: String,
    pub provider_timeout_secs: u64,
    pub redis_url: Option<String>,
    pub redis_token: Option<String>,
    pub quota_store_timeout_ms: u64,
    pub site_url: Option<String>,
    pub dev_origin: Option<String>,
    pub daily_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load(config::Environment::default())
    }

    /// Builds the configuration from an explicit variable map instead of the
    /// process environment. Keys use the same upper-case names as the env.
    pub fn from_source(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(config::Environment::default().source(Some(vars)))
    }

    fn load(environment: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("openai_base_url", "https://api.openai.com/v1")?
            .set_default("image_model", "dall-e-3")?
            .set_default("image_size", "1792x1024")?
            .set_default("image_quality", "standard")?
            .set_default("provider_timeout_secs", 60)?
            .set_default("quota_store_timeout_ms", 2000)?
            .set_default("dev_origin", "http://localhost:3000")?
            .set_default("daily_limit", 3)?
            .add_source(environment.try_parsing(true))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config.normalized())
    }

    // Empty values in .env files mean "unset".
    fn normalized(mut self) -> Self {
        for value in [
            &mut self.openai_api_key,
            &mut self.redis_url,
            &mut self.redis_token,
            &mut self.site_url,
            &mut self.dev_origin,
        ] {
            if value.as_deref().map_or(false, |v| v.trim().is_empty()) {
                *value = None;
            }
        }
        self
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn quota_store_timeout(&self) -> Duration {
        Duration::from_millis(self.quota_store_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origins allowed to call the generate endpoint. Empty when no
    /// canonical site URL is configured.
    pub fn allowed_origins(&self) -> Vec<String> {
        let Some(site_url) = self.site_url.as_deref() else {
            return Vec::new();
        };

        std::iter::once(site_url)
            .chain(self.dev_origin.as_deref())
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}
