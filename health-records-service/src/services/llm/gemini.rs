//! Gemini provider.
//!
//! Text and structured-JSON completions over the `generateContent` endpoint.
//! Images are fetched from their URL and sent inline as base64.

use super::{Completion, CompletionRequest, LlmError, LlmProvider};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Largest image we are willing to inline into a prompt.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub request_timeout: Duration,
}

pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        // Redirects could send an image fetch to a host that was never vetted.
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| LlmError::NotConfigured(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            GEMINI_API_BASE, self.config.model, method, self.config.api_key
        )
    }

    async fn fetch_image(&self, url: &str) -> Result<ContentPart, LlmError> {
        let url = check_image_url(url).await?;

        let response = self
            .client
            .traced_get(url.as_str())
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(format!("Failed to fetch image: {}", e)))?;

        if !response.status().is_success() {
            return Err(LlmError::InvalidRequest(format!(
                "Image URL returned {}",
                response.status()
            )));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or("image/jpeg")
            .to_string();

        let bytes = read_capped(response, MAX_IMAGE_BYTES).await?;

        Ok(ContentPart::InlineData {
            inline_data: InlineData {
                mime_type,
                data: STANDARD.encode(&bytes),
            },
        })
    }

    fn generation_config(request: &CompletionRequest) -> GenerationConfig {
        GenerationConfig {
            temperature: request.temperature,
            response_mime_type: request
                .response_schema
                .as_ref()
                .map(|_| "application/json".to_string()),
            response_schema: request.response_schema.clone(),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        if self.config.api_key.is_empty() {
            return Err(LlmError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let mut parts = Vec::with_capacity(request.image_urls.len() + 1);
        for url in &request.image_urls {
            parts.push(self.fetch_image(url).await?);
        }
        parts.push(ContentPart::Text {
            text: request.prompt.clone(),
        });

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: Some(Self::generation_config(request)),
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            image_count = request.image_urls.len(),
            structured = request.response_schema.is_some(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .traced_post(&self.api_url("generateContent"))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(LlmError::RateLimited);
            }

            return Err(LlmError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ApiError(format!("Failed to parse response: {}", e)))?;

        let candidate = api_response
            .candidates
            .first()
            .ok_or_else(|| LlmError::MalformedResponse("No candidates returned".to_string()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(LlmError::ContentFiltered);
        }

        let text = candidate
            .content
            .parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                ContentPart::InlineData { .. } => None,
            })
            .collect::<String>();

        let usage = api_response.usage_metadata.unwrap_or_default();

        Ok(Completion {
            text,
            input_tokens: usage.prompt_token_count.unwrap_or(0),
            output_tokens: usage.candidates_token_count.unwrap_or(0),
        })
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        if self.config.api_key.is_empty() {
            return Err(LlmError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// Only public https hosts may be fetched. Every address the host resolves
/// to is checked, not just the first.
async fn check_image_url(raw: &str) -> Result<reqwest::Url, LlmError> {
    let url = reqwest::Url::parse(raw)
        .map_err(|e| LlmError::InvalidRequest(format!("Invalid image URL: {}", e)))?;

    if url.scheme() != "https" {
        return Err(LlmError::InvalidRequest(
            "Image URL must use https".to_string(),
        ));
    }

    let host = url
        .host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
        .filter(|h| !h.is_empty())
        .ok_or_else(|| LlmError::InvalidRequest("Image URL has no host".to_string()))?;
    let port = url.port_or_known_default().unwrap_or(443);

    let addrs: Vec<IpAddr> = match host.parse::<IpAddr>() {
        Ok(ip) => vec![ip],
        Err(_) => tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| LlmError::NetworkError(format!("Failed to resolve image host: {}", e)))?
            .map(|addr| addr.ip())
            .collect(),
    };

    if addrs.is_empty() || addrs.iter().any(|ip| !is_public(ip)) {
        return Err(LlmError::InvalidRequest(format!(
            "Image host {} is not publicly routable",
            host
        )));
    }

    Ok(url)
}

fn is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_public_v4(&v4),
            None => is_public_v6(v6),
        },
    }
}

fn is_public_v4(ip: &Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    // 100.64.0.0/10 is carrier-grade NAT.
    let shared = a == 100 && (64..128).contains(&b);
    !(ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_documentation()
        || shared)
}

fn is_public_v6(ip: &Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    let unique_local = (first & 0xfe00) == 0xfc00;
    let link_local = (first & 0xffc0) == 0xfe80;
    !(ip.is_loopback() || ip.is_unspecified() || unique_local || link_local)
}

/// Reads the body chunk by chunk and gives up as soon as it passes `limit`.
async fn read_capped(mut response: reqwest::Response, limit: usize) -> Result<Vec<u8>, LlmError> {
    let too_large = || LlmError::InvalidRequest(format!("Image exceeds the {} byte limit", limit));

    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(too_large());
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| LlmError::NetworkError(format!("Failed to read image: {}", e)))?
    {
        if bytes.len() + chunk.len() > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}
