//! Backend gateway trait.
//!
//! The three remote operations the client sequences. Futures are `?Send`
//! because the web build drives them on the single wasm thread.

use async_trait::async_trait;

use crate::error::GatewayResult;
use crate::types::{AnalyzeResponse, HealthStatus, Message, Stats, UploadFile};

#[async_trait(?Send)]
pub trait BackendGateway {
    /// Upload a table and receive statistics, a report type and chart artifacts.
    async fn analyze(&self, file: &UploadFile) -> GatewayResult<AnalyzeResponse>;

    /// Ask for a narrative over `stats`. `instruction` may be empty.
    async fn generate(&self, stats: &Stats, instruction: &str) -> GatewayResult<String>;

    /// One conversational turn. `history` ends with the user's new message.
    async fn chat(&self, stats: &Stats, history: &[Message]) -> GatewayResult<String>;

    /// Liveness check. Gateways without one report healthy.
    async fn health(&self) -> GatewayResult<HealthStatus> {
        Ok(HealthStatus {
            status: "ok".to_string(),
            message: String::new(),
        })
    }
}
