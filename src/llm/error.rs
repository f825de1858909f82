//! LLM backend errors
//!
//! [`BackendError`] is what every [`LLMClient`](super::LLMClient) returns on
//! failure. The completion layer only cares whether a failure is worth
//! another attempt, which is what [`BackendError::is_transient`] answers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur during backend operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendError {
    /// API request failed with the given message
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Authentication failed or credentials are invalid
    AuthenticationError { message: String },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// Rate limit exceeded, retry after the specified duration (in seconds)
    RateLimitError { retry_after: Option<u64> },

    /// Invalid or malformed response from the LLM
    InvalidResponse {
        message: String,
        raw_response: Option<String>,
    },

    /// Configuration error (missing API keys, invalid settings, etc.)
    ConfigurationError { message: String },

    /// Network-related error
    NetworkError { message: String },

    /// Generic error for other cases
    Other { message: String },
}

impl BackendError {
    /// Returns true if the failure is likely to clear up on its own
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::TimeoutError { .. }
            | BackendError::NetworkError { .. }
            | BackendError::RateLimitError { .. } => true,
            BackendError::ApiError { status_code, .. } => {
                matches!(status_code, Some(code) if *code == 429 || *code >= 500)
            }
            _ => false,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error ({}): {}", code, message)
                } else {
                    write!(f, "API error: {}", message)
                }
            }
            BackendError::AuthenticationError { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            BackendError::RateLimitError { retry_after } => {
                if let Some(seconds) = retry_after {
                    write!(f, "Rate limit exceeded, retry after {} seconds", seconds)
                } else {
                    write!(f, "Rate limit exceeded")
                }
            }
            BackendError::InvalidResponse { message, .. } => {
                write!(f, "Invalid response from LLM: {}", message)
            }
            BackendError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            BackendError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            BackendError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Maps a provider error message onto the closest [`BackendError`] variant
///
/// Provider SDKs surface most failures as opaque strings, so the status code
/// and failure class are recovered from the text.
pub fn classify_provider_error(provider: &str, message: &str) -> BackendError {
    let lower = message.to_lowercase();
    let status_code = extract_status_code(&lower);

    if status_code == Some(429) || lower.contains("rate limit") || lower.contains("too many requests")
    {
        return BackendError::RateLimitError { retry_after: None };
    }

    if matches!(status_code, Some(401) | Some(403))
        || lower.contains("unauthorized")
        || lower.contains("invalid api key")
        || lower.contains("api key not found")
    {
        return BackendError::AuthenticationError {
            message: format!("{}: {}", provider, message),
        };
    }

    if lower.contains("timed out") || lower.contains("timeout") {
        return BackendError::NetworkError {
            message: format!("{} request timed out: {}", provider, message),
        };
    }

    if lower.contains("connection refused")
        || lower.contains("connection reset")
        || lower.contains("could not resolve")
        || lower.contains("dns error")
        || lower.contains("error sending request")
        || lower.contains("broken pipe")
    {
        return BackendError::NetworkError {
            message: format!("{}: {}", provider, message),
        };
    }

    BackendError::ApiError {
        message: format!("{} request failed: {}", provider, message),
        status_code,
    }
}

fn extract_status_code(lower: &str) -> Option<u16> {
    [429u16, 500, 502, 503, 504, 400, 401, 403, 404, 422]
        .into_iter()
        .find(|code| {
            let code = code.to_string();
            lower.contains(&format!("status {}", code))
                || lower.contains(&format!("status: {}", code))
                || lower.contains(&format!("status code {}", code))
                || lower.contains(&format!("http {}", code))
                || lower.contains(&format!("({})", code))
        })
}
