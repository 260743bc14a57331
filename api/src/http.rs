//! reqwest-backed gateway talking to the analysis backend over HTTP.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::BackendGateway;
use crate::types::{
    AnalyzeResponse, ChatRequest, ChatResponse, GenerateRequest, GenerateResponse, HealthStatus,
    Message, Stats, UploadFile,
};

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(GatewayConfig::from_env())
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl BackendGateway for HttpGateway {
    async fn analyze(&self, file: &UploadFile) -> GatewayResult<AnalyzeResponse> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(file.mime_type())?;
        let form = Form::new().part("file", part);

        tracing::debug!(file = %file.name, bytes = file.bytes.len(), "uploading table");
        let response = self
            .client
            .post(self.config.endpoint("/api/upload"))
            .multipart(form)
            .send()
            .await?;

        let mut parsed: AnalyzeResponse = read_json(response).await?;
        for plot in &mut parsed.plots {
            plot.url = self.config.resolve_plot_url(&plot.url);
        }
        Ok(parsed)
    }

    async fn generate(&self, stats: &Stats, instruction: &str) -> GatewayResult<String> {
        let response = self
            .client
            .post(self.config.endpoint("/api/generate"))
            .json(&GenerateRequest { stats, instruction })
            .send()
            .await?;

        let parsed: GenerateResponse = read_json(response).await?;
        Ok(parsed.report)
    }

    async fn chat(&self, stats: &Stats, history: &[Message]) -> GatewayResult<String> {
        let response = self
            .client
            .post(self.config.endpoint("/api/chat"))
            .json(&ChatRequest { stats, history })
            .send()
            .await?;

        let parsed: ChatResponse = read_json(response).await?;
        Ok(parsed.response)
    }

    async fn health(&self) -> GatewayResult<HealthStatus> {
        let response = self
            .client
            .get(self.config.endpoint("/health"))
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> GatewayResult<T> {
    let status = response.status();
    let body = response.text().await?;
    decode_body(status.as_u16(), &body)
}

/// An `error` field wins over the HTTP status; the backend also reports
/// failures inside 200 responses.
pub(crate) fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> GatewayResult<T> {
    let success = (200..300).contains(&status);
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if !success => return Err(GatewayError::Transport(format!("HTTP {status}"))),
        Err(err) => return Err(GatewayError::Decode(err.to_string())),
    };

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        tracing::warn!(status, %message, "backend reported an error");
        return Err(GatewayError::Backend(message.to_string()));
    }

    if !success {
        return Err(GatewayError::Transport(format!("HTTP {status}")));
    }

    serde_json::from_value(value).map_err(|err| GatewayError::Decode(err.to_string()))
}
