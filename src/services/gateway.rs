use std::sync::Arc;

use crate::{
    errors::{GatewayError, GatewayRejection},
    models::{ClientIdentity, GenerationResult},
    services::{
        image_provider::ImageProvider, origin_guard::OriginGuard, prompt_builder::build_prompt,
        quota_manager::QuotaEnforcer, validator::validate,
    },
};

/// Request gate in front of the image provider.
///
/// Steps run in a fixed order and stop at the first failure:
/// credential, origin, quota, body validation, provider call.
///
/// The quota unit is charged at the gate. A request that passes the origin
/// check spends a unit even if its body is then rejected or the provider
/// fails, and nothing is refunded.
pub struct Gateway {
    provider: Option<Arc<dyn ImageProvider>>,
    origin_guard: OriginGuard,
    quota: QuotaEnforcer,
}

impl Gateway {
    pub fn new(
        provider: Option<Arc<dyn ImageProvider>>,
        origin_guard: OriginGuard,
        quota: QuotaEnforcer,
    ) -> Self {
        Self {
            provider,
            origin_guard,
            quota,
        }
    }

    pub fn quota(&self) -> &QuotaEnforcer {
        &self.quota
    }

    pub fn origin_guard(&self) -> &OriginGuard {
        &self.origin_guard
    }

    pub async fn handle(
        &self,
        identity: &ClientIdentity,
        origin: Option<&str>,
        raw_body: &[u8],
    ) -> Result<GenerationResult, GatewayRejection> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(GatewayError::ServiceMisconfigured)?;

        if !self.origin_guard.is_allowed_origin(origin) {
            return Err(GatewayError::ForbiddenOrigin(origin.unwrap_or_default().to_string()).into());
        }

        let decision = self.quota.check_and_consume(identity).await?;
        if !decision.allowed {
            return Err(GatewayError::QuotaExceeded {
                limit: self.quota.limit(),
            }
            .into());
        }
        let remaining = decision.remaining;

        let request = validate(raw_body).map_err(|e| GatewayRejection::charged(e, remaining))?;

        let prompt = build_prompt(
            &request.title,
            request.style.as_str(),
            request.keywords.as_deref(),
        );
        tracing::info!(style = %request.style, "Requesting thumbnail for {:?}", request.title);

        let image = provider
            .generate(&prompt)
            .await
            .map_err(|e| GatewayRejection::charged(e, remaining))?;

        Ok(GenerationResult {
            image_url: image.url,
            revised_prompt: image.revised_prompt,
            remaining_quota: remaining,
        })
    }
}
