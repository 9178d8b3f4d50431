//! Logistics API client error types.

/// Errors from the logistics API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The requested record does not exist
    #[error("not found")]
    NotFound,

    /// The record was changed by someone else since it was loaded
    #[error("conflict: the record was modified by someone else ({message})")]
    Conflict { message: String },

    /// Rate limited by the API
    #[error("rate limited by the logistics API")]
    RateLimited,

    /// Missing or rejected credentials
    #[error("unauthorized: check LOGISTICS_API_USERNAME and LOGISTICS_API_PASSWORD")]
    Unauthorized,

    /// Client could not be configured
    #[error("invalid configuration: {0}")]
    Config(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl ApiError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(e) => e.is_timeout() || e.is_connect(),
            ApiError::RateLimited => true,
            ApiError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApiError::NotFound;
        assert_eq!(err.to_string(), "not found");

        let err = ApiError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = ApiError::Json {
            message: "expected a sequence".into(),
            body: Some("{}".into()),
        };
        assert_eq!(
            err.to_string(),
            "JSON parse error: expected a sequence (body: {})"
        );

        let err = ApiError::Json {
            message: "expected a sequence".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "JSON parse error: expected a sequence");
    }

    #[test]
    fn transient_errors() {
        assert!(ApiError::RateLimited.is_transient());
        assert!(
            ApiError::Api {
                status: 503,
                message: String::new()
            }
            .is_transient()
        );
        assert!(
            !ApiError::Api {
                status: 400,
                message: String::new()
            }
            .is_transient()
        );
        assert!(!ApiError::NotFound.is_transient());
        assert!(
            !ApiError::Conflict {
                message: String::new()
            }
            .is_transient()
        );
    }
}
