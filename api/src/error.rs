use thiserror::Error;

/// Failure of a single gateway round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backend answered with an `{ "error": ... }` body.
    #[error("{0}")]
    Backend(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Message supplied by the backend itself, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            GatewayError::Backend(message) if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// User-facing text: the backend's message when present, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_takes_precedence() {
        let err = GatewayError::Backend("No selected file".into());
        assert_eq!(err.user_message("Upload failed"), "No selected file");
    }

    #[test]
    fn transport_and_blank_messages_fall_back() {
        let err = GatewayError::Transport("connection refused".into());
        assert_eq!(err.user_message("Upload failed"), "Upload failed");

        let blank = GatewayError::Backend("   ".into());
        assert_eq!(blank.user_message("Generation failed"), "Generation failed");
    }
}
