use thiserror::Error;

/// Failures talking to the ServicePro backend.
///
/// `Rejected` keeps the server's own `error` string when the response body
/// carried one, so the UI can show it verbatim. `Transport` covers everything
/// where no response arrived at all.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server rejected the request (HTTP {status})")]
    Rejected { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid base URL: {0}")]
    BadBaseUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Message suitable for a toast: server text verbatim when we have it,
    /// a generic line otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(msg), ..
            } => msg.clone(),
            ApiError::Rejected { message: None, .. } => fallback.to_string(),
            ApiError::Transport(_) | ApiError::BadBaseUrl(_) => {
                "Network error: could not reach the server.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_shown_verbatim() {
        let err = ApiError::Rejected {
            status: 401,
            message: Some("Invalid credentials".into()),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    }

    #[test]
    fn missing_server_message_falls_back() {
        let err = ApiError::Rejected {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Login failed"), "Login failed");
    }
}
