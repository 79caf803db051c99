use super::types::ErrorResponse;
use thiserror::Error;

/// Failure of a single request to the game service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (refused, reset, timed out)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with status >= 400
    #[error("{}", describe_service_error(.status, .body, .raw))]
    Service {
        status: u16,
        body: Option<ErrorResponse>,
        raw: String,
    },

    /// A success response whose body did not match the expected shape
    #[error("invalid response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Build a service error, falling back to the raw body when it isn't the
    /// structured `{error, code, details}` shape.
    pub fn from_status(status: u16, raw: String) -> Self {
        let body = serde_json::from_str::<ErrorResponse>(&raw).ok();
        ApiError::Service { status, body, raw }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_timeout())
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_connect())
    }
}

fn describe_service_error(status: &u16, body: &Option<ErrorResponse>, raw: &str) -> String {
    match body {
        Some(body) => {
            let mut out = format!("{} (status {}", body.error, status);
            if !body.code.is_empty() {
                out.push_str(&format!(", code {}", body.code));
            }
            out.push(')');
            if let Some(details) = body.details.as_deref().filter(|d| !d.is_empty()) {
                out.push_str(&format!("\n   Details: {}", details));
            }
            out
        }
        None if raw.trim().is_empty() => format!("request failed with status {}", status),
        None => format!("request failed with status {}: {}", status, raw.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_error_body() {
        let err = ApiError::from_status(
            400,
            r#"{"error":"illegal move","code":"INVALID_MOVE","details":"e2e5 is not legal"}"#
                .to_string(),
        );
        let text = err.to_string();
        assert!(text.contains("illegal move"));
        assert!(text.contains("INVALID_MOVE"));
        assert!(text.contains("e2e5 is not legal"));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_unparseable_error_body_falls_back_to_raw() {
        let err = ApiError::from_status(502, "<html>Bad Gateway</html>".to_string());
        match &err {
            ApiError::Service { body, .. } => assert!(body.is_none()),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("<html>Bad Gateway</html>"));
    }

    #[test]
    fn test_empty_error_body() {
        let err = ApiError::from_status(404, String::new());
        assert_eq!(err.to_string(), "request failed with status 404");
    }
}
