use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::{sync::Arc, time::Duration};

use crate::{
    errors::Result,
    models::{until_window_end, window_for, ClientIdentity, QuotaDecision},
    services::quota_store::QuotaStore,
};

// Stored counters outlive the window slightly so late writes near midnight
// still expire on their own.
const WINDOW_GRACE: Duration = Duration::from_secs(60);

/// Per-identity daily quota on top of a [`QuotaStore`].
pub struct QuotaEnforcer {
    store: Arc<dyn QuotaStore>,
    limit: u32,
}

impl QuotaEnforcer {
    pub fn new(store: Arc<dyn QuotaStore>, limit: u32) -> Self {
        Self { store, limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn store(&self) -> &Arc<dyn QuotaStore> {
        &self.store
    }

    pub async fn check_and_consume(&self, identity: &ClientIdentity) -> Result<QuotaDecision> {
        self.check_and_consume_at(identity, Utc::now()).await
    }

    /// Consumes one unit for `identity` in the window containing `now`.
    /// The check and the increment are a single store operation.
    pub async fn check_and_consume_at(
        &self,
        identity: &ClientIdentity,
        now: DateTime<Utc>,
    ) -> Result<QuotaDecision> {
        let window = window_for(now);
        let ttl = until_window_end(now) + WINDOW_GRACE;
        let key = identity_key(identity);

        let outcome = self.store.consume(&key, &window, self.limit, ttl).await?;
        if !outcome.allowed {
            tracing::info!(%identity, %window, "Daily quota exhausted");
            return Ok(QuotaDecision {
                allowed: false,
                remaining: 0,
            });
        }

        let remaining = self.limit.saturating_sub(outcome.count);
        tracing::debug!(%identity, %window, count = outcome.count, remaining, "Quota unit consumed");

        Ok(QuotaDecision {
            allowed: true,
            remaining,
        })
    }
}

/// Stores never see raw addresses, only their digest.
pub fn identity_key(identity: &ClientIdentity) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}
