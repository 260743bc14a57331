//! Gateway configuration.
//!
//! The backend location comes from `NARRATOR_API_URL`: read at runtime on
//! native targets, baked in at build time on wasm (there is no process
//! environment in the browser).

pub const BASE_URL_ENV: &str = "NARRATOR_API_URL";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Where backend-relative plot files are served from.
const PLOTS_PATH: &str = "/plots/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    base_url: String,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');
        let base_url = if trimmed.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        Self { base_url }
    }

    pub fn from_env() -> Self {
        match env_base_url() {
            Some(url) => Self::new(url),
            None => Self::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/api/upload`.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Absolute URLs pass through; bare file names resolve under `/plots/`.
    pub fn resolve_plot_url(&self, raw: &str) -> String {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
        {
            raw.to_string()
        } else if raw.starts_with('/') {
            self.endpoint(raw)
        } else {
            format!("{}{PLOTS_PATH}{raw}", self.base_url)
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_base_url() -> Option<String> {
    std::env::var(BASE_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn env_base_url() -> Option<String> {
    option_env!("NARRATOR_API_URL").map(str::to_string)
}
