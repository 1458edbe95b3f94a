use crate::{
    config::Config,
    services::{
        gateway::Gateway,
        image_provider::{ImageProvider, OpenAiImageProvider},
        metrics::MetricsService,
        origin_guard::OriginGuard,
        quota_manager::QuotaEnforcer,
        quota_store::{FallbackQuotaStore, MemoryQuotaStore, QuotaStore},
        rate_limiter::RedisQuotaStore,
    },
};
use std::sync::Arc;

pub mod generate;
pub mod health;
pub mod docs;
pub mod metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<Gateway>,
    pub metrics: Arc<MetricsService>,
}

impl AppState {
    /// Wires the gateway from configuration. With a Redis URL the quota store
    /// is Redis behind the in-memory fallback, even if Redis is down at boot.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let metrics = Arc::new(MetricsService::new()?);
        let store = connect_quota_store(&config, metrics.clone()).await;
        Self::with_store(config, store, metrics)
    }

    pub fn with_store(
        config: Config,
        store: Arc<dyn QuotaStore>,
        metrics: Arc<MetricsService>,
    ) -> anyhow::Result<Self> {
        let provider = match config.openai_api_key.clone() {
            Some(api_key) => {
                Some(Arc::new(OpenAiImageProvider::new(api_key, &config)?) as Arc<dyn ImageProvider>)
            }
            None => {
                tracing::error!("OPENAI_API_KEY is not set; every generate request will fail");
                None
            }
        };

        let gateway = Gateway::new(
            provider,
            OriginGuard::new(config.allowed_origins()),
            QuotaEnforcer::new(store, config.daily_limit),
        );

        Ok(Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
            metrics,
        })
    }
}

async fn connect_quota_store(config: &Config, metrics: Arc<MetricsService>) -> Arc<dyn QuotaStore> {
    let Some(redis_url) = config.redis_url.as_deref() else {
        tracing::warn!(
            "REDIS_URL not set; using in-memory quota counters. They reset on restart and are \
             not shared between instances, so do not run more than one instance this way"
        );
        return Arc::new(MemoryQuotaStore::new());
    };

    let durable = Arc::new(RedisQuotaStore::new(redis_url, config.redis_token.clone()));
    match tokio::time::timeout(config.quota_store_timeout(), durable.ping()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(
                "Redis unreachable at startup ({}); counting in memory until it connects",
                e
            );
        }
        Err(_) => {
            tracing::warn!("Redis connect timed out at startup; counting in memory until it connects");
        }
    }

    Arc::new(FallbackQuotaStore::new(durable, config.quota_store_timeout(), metrics))
}
