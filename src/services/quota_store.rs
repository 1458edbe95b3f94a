use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::Mutex;

use crate::{
    errors::Result,
    models::{ConsumeOutcome, UsageRecord},
    services::metrics::MetricsService,
};

/// Counter storage behind the quota enforcer.
///
/// `consume` must be atomic per key: read the count, refuse without
/// mutating when it has reached `limit`, otherwise increment it.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    async fn consume(&self, key: &str, window: &str, limit: u32, ttl: Duration) -> Result<ConsumeOutcome>;

    async fn ping(&self) -> Result<()>;

    fn backend(&self) -> &'static str;
}

/// Process-local counters.
///
/// Resets on restart and is not shared between instances, so it must not
/// be used for multi-instance deployments. Meant for development, tests and
/// as the fallback when the durable store is unreachable.
#[derive(Default)]
pub struct MemoryQuotaStore {
    state: Mutex<MemoryState>,
}

/// Every record in `records` belongs to `window`.
#[derive(Default)]
struct MemoryState {
    window: String,
    records: HashMap<String, UsageRecord>,
}

impl MemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, key: &str) -> Option<UsageRecord> {
        self.state.lock().await.records.get(key).cloned()
    }

    pub async fn tracked_keys(&self) -> usize {
        self.state.lock().await.records.len()
    }
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn consume(&self, key: &str, window: &str, limit: u32, _ttl: Duration) -> Result<ConsumeOutcome> {
        let mut state = self.state.lock().await;

        if state.window != window {
            state.records.retain(|_, record| record.window == window);
            state.window = window.to_string();
        }

        let record = state.records.entry(key.to_string()).or_insert_with(|| UsageRecord {
            identity: key.to_string(),
            count: 0,
            window: window.to_string(),
        });

        if record.count >= limit {
            return Ok(ConsumeOutcome {
                allowed: false,
                count: record.count,
            });
        }

        record.count += 1;
        Ok(ConsumeOutcome {
            allowed: true,
            count: record.count,
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Durable store with an in-memory fallback for when it errors or stalls.
pub struct FallbackQuotaStore {
    primary: Arc<dyn QuotaStore>,
    fallback: MemoryQuotaStore,
    timeout: Duration,
    metrics: Arc<MetricsService>,
}

impl FallbackQuotaStore {
    pub fn new(primary: Arc<dyn QuotaStore>, timeout: Duration, metrics: Arc<MetricsService>) -> Self {
        Self {
            primary,
            fallback: MemoryQuotaStore::new(),
            timeout,
            metrics,
        }
    }
}

#[async_trait]
impl QuotaStore for FallbackQuotaStore {
    async fn consume(&self, key: &str, window: &str, limit: u32, ttl: Duration) -> Result<ConsumeOutcome> {
        match tokio::time::timeout(self.timeout, self.primary.consume(key, window, limit, ttl)).await {
            Ok(Ok(outcome)) => return Ok(outcome),
            Ok(Err(e)) => {
                tracing::warn!("Quota store {} failed, using in-memory counter: {}", self.primary.backend(), e);
            }
            Err(_) => {
                tracing::warn!(
                    "Quota store {} timed out after {:?}, using in-memory counter",
                    self.primary.backend(),
                    self.timeout
                );
            }
        }

        self.metrics.record_quota_fallback();
        self.fallback.consume(key, window, limit, ttl).await
    }

    async fn ping(&self) -> Result<()> {
        self.primary.ping().await
    }

    fn backend(&self) -> &'static str {
        self.primary.backend()
    }
}
