//! Backend gateway for DataNarrator: wire types, typed errors and the HTTP client.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod types;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::BackendGateway;
pub use http::HttpGateway;
pub use types::{
    AnalyzeResponse, BasicInfo, HealthStatus, Message, NumericSummary, Plot, PlotKind, Role, Stats,
    UploadFile, ACCEPTED_UPLOAD_EXTENSIONS,
};
