//! Amazon Bedrock runtime backend for Anthropic models.
//!
//! Sends Messages-API bodies to `InvokeModel`, signed with SigV4.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, instrument};

use super::credentials::AwsCredentials;
use super::sigv4::{uri_encode, SignableRequest, SigV4Signer};
use super::{MessageRequest, MessageResponse, ModelBackend};
use crate::error::{BackendError, BenchError, Result};

/// Anthropic API version string Bedrock expects in the request body.
pub const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Default backend label recorded in reports.
pub const BEDROCK_BACKEND_LABEL: &str = "anthropic-sdk-bedrock";

/// Claude Opus 4.5 through the US cross-region inference profile.
pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-opus-4-5-20251101-v1:0";

const SIGNING_SERVICE: &str = "bedrock";
const CONTENT_TYPE: &str = "application/json";

/// Bedrock connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedrockConfig {
    pub region: String,
    pub model_id: String,
    pub label: String,
    /// Override for the runtime endpoint (proxies, tests).
    pub endpoint: Option<String>,
}

impl BedrockConfig {
    pub fn new(region: &str, model_id: &str) -> Self {
        Self {
            region: region.to_string(),
            model_id: model_id.to_string(),
            label: BEDROCK_BACKEND_LABEL.to_string(),
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.trim_end_matches('/').to_string());
        self
    }

    /// Runtime endpoint base URL.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", self.region))
    }

    /// Encoded `InvokeModel` request path for the configured model.
    pub fn invoke_path(&self) -> String {
        format!("/model/{}/invoke", uri_encode(&self.model_id))
    }
}

#[derive(Serialize)]
struct InvokeBody<'a> {
    anthropic_version: &'a str,
    #[serde(flatten)]
    request: &'a MessageRequest,
}

/// Serialize `request` into a Bedrock `InvokeModel` body.
pub fn invoke_body(request: &MessageRequest) -> std::result::Result<Vec<u8>, BackendError> {
    let body = InvokeBody {
        anthropic_version: BEDROCK_ANTHROPIC_VERSION,
        request,
    };
    serde_json::to_vec(&body).map_err(|e| BackendError::Request(e.to_string()))
}

/// Pull a human-readable message out of a Bedrock error body.
pub fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("message").or_else(|| v.get("Message")))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Bedrock runtime client bound to one model, region and credential set.
pub struct BedrockBackend {
    config: BedrockConfig,
    credentials: AwsCredentials,
    signer: SigV4Signer,
    http_client: reqwest::Client,
}

impl BedrockBackend {
    pub fn new(config: BedrockConfig, credentials: AwsCredentials) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("promptbench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BenchError::HttpClient(e.to_string()))?;
        let signer = SigV4Signer::new(SIGNING_SERVICE, config.region.clone());

        Ok(Self {
            config,
            credentials,
            signer,
            http_client,
        })
    }

    pub fn config(&self) -> &BedrockConfig {
        &self.config
    }
}

#[async_trait]
impl ModelBackend for BedrockBackend {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }

    #[instrument(skip_all, fields(model = %self.config.model_id))]
    async fn invoke(
        &self,
        request: &MessageRequest,
    ) -> std::result::Result<MessageResponse, BackendError> {
        let path = self.config.invoke_path();
        let url = reqwest::Url::parse(&format!("{}{}", self.config.endpoint(), path))
            .map_err(|e| BackendError::Request(format!("invalid endpoint: {e}")))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(BackendError::Request(format!("no host in {url}"))),
        };

        let body = invoke_body(request)?;
        let signed = self.signer.sign(
            &SignableRequest {
                method: "POST",
                path: &path,
                query: "",
                headers: vec![
                    ("content-type".to_string(), CONTENT_TYPE.to_string()),
                    ("host".to_string(), host),
                ],
                payload: &body,
            },
            &self.credentials,
            Utc::now(),
        )?;

        debug!(url = %url, bytes = body.len(), "Invoking Bedrock model");
        let mut builder = self
            .http_client
            .post(url)
            .header("content-type", CONTENT_TYPE)
            .header("accept", CONTENT_TYPE)
            .header("x-amz-date", &signed.amz_date)
            .header("authorization", &signed.authorization);
        if let Some(token) = &signed.security_token {
            builder = builder.header("x-amz-security-token", token);
        }

        let response = builder.body(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_endpoint_follows_region() {
        let cfg = BedrockConfig::new("eu-west-1", DEFAULT_MODEL_ID);
        assert_eq!(
            cfg.endpoint(),
            "https://bedrock-runtime.eu-west-1.amazonaws.com"
        );
        assert_eq!(cfg.label, BEDROCK_BACKEND_LABEL);
    }

    #[test]
    fn endpoint_override_strips_trailing_slash() {
        let cfg = BedrockConfig::new("us-east-1", "m").with_endpoint("http://127.0.0.1:9000/");
        assert_eq!(cfg.endpoint(), "http://127.0.0.1:9000");
    }

    #[test]
    fn invoke_path_encodes_model_id() {
        let cfg = BedrockConfig::new("us-east-1", DEFAULT_MODEL_ID);
        assert_eq!(
            cfg.invoke_path(),
            "/model/us.anthropic.claude-opus-4-5-20251101-v1%3A0/invoke"
        );
    }

    #[test]
    fn body_carries_anthropic_version_and_request_fields() {
        let req = MessageRequest::builder("hi")
            .system("sys")
            .max_tokens(8192)
            .thinking(4096)
            .build();
        let body: serde_json::Value =
            serde_json::from_slice(&invoke_body(&req).expect("body")).expect("json");
        assert_eq!(body["anthropic_version"], json!(BEDROCK_ANTHROPIC_VERSION));
        assert_eq!(body["max_tokens"], json!(8192));
        assert_eq!(body["system"], json!("sys"));
        assert_eq!(body["messages"][0]["content"], json!("hi"));
        assert_eq!(body["thinking"]["budget_tokens"], json!(4096));
    }

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(
            error_message(r#"{"message":"insufficient quota"}"#),
            "insufficient quota"
        );
        assert_eq!(
            error_message(r#"{"Message":"User is not authorized"}"#),
            "User is not authorized"
        );
        assert_eq!(error_message("  upstream timeout \n"), "upstream timeout");
    }
}
