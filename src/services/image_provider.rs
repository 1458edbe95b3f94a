use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{GatewayError, Result},
    models::GeneratedImage,
};

const CONTENT_POLICY_CODE: &str = "content_policy_violation";

/// External text-to-image service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// One attempt, no retries. Failures go straight back to the caller.
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage>;
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

/// OpenAI Images API client.
pub struct OpenAiImageProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    size: String,
    quality: String,
}

impl OpenAiImageProvider {
    pub fn new(api_key: String, config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.provider_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/images/generations",
                config.openai_base_url.trim_end_matches('/')
            ),
            api_key,
            model: config.image_model.clone(),
            size: config.image_size.clone(),
            quality: config.image_quality.clone(),
        })
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageProvider {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        let request = ImageGenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: &self.size,
            quality: &self.quality,
            response_format: "url",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::ProviderUnavailable(format!("request timed out: {e}"))
                } else {
                    GatewayError::NetworkOrUnknown(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: ProviderErrorBody = response.json().await.unwrap_or_default();
            let detail = body.error;
            let code = detail.as_ref().and_then(|d| d.code.as_deref());
            let provider_message = detail.as_ref().and_then(|d| d.message.as_deref()).unwrap_or("");

            tracing::error!(%status, code, provider_message, "Image provider returned an error");

            if status == StatusCode::BAD_REQUEST && code == Some(CONTENT_POLICY_CODE) {
                return Err(GatewayError::ContentPolicyRejected);
            }
            return Err(GatewayError::ProviderUnavailable(format!("status {status}")));
        }

        let payload: ImageGenerationResponse = response.json().await?;
        let first = payload.data.into_iter().next();
        let revised_prompt = first.as_ref().and_then(|d| d.revised_prompt.clone());

        match first.and_then(|d| d.url).filter(|url| !url.is_empty()) {
            Some(url) => {
                tracing::debug!("Image provider returned {}", url);
                Ok(GeneratedImage {
                    url,
                    revised_prompt,
                })
            }
            None => Err(GatewayError::EmptyProviderResponse),
        }
    }
}
