use reqwest::{Method, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Discord's JSON error code for a message that no longer exists.
pub const UNKNOWN_MESSAGE: u64 = 10008;

/// Errors returned by calls to the Discord REST API.
///
/// Rate limiting never surfaces here: the client absorbs 429 responses by waiting and
/// retrying, so every variant is terminal for the request that produced it.
#[derive(Error, Debug)]
pub enum DiscordError {
    /// Discord answered with a non-success status other than 429.
    ///
    /// The response body is passed through untouched for diagnostics. Use `code()` to read
    /// Discord's JSON error code out of it.
    #[error("Discord API {method} {path} failed: {status} {body}")]
    Api {
        /// HTTP method of the failed request
        method: Method,
        /// Request path relative to the API base URL
        path: String,
        /// Status code Discord returned
        status: StatusCode,
        /// Raw response body
        body: String,
    },

    /// The request never produced a response (connection, TLS, timeout).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A success response carried a body that does not match the expected shape.
    #[error("Failed to decode Discord response from {path}: {source}")]
    Decode {
        /// Request path relative to the API base URL
        path: String,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<u64>,
}

impl DiscordError {
    /// Discord's JSON error code, when the failure was an API error with a JSON body.
    pub fn code(&self) -> Option<u64> {
        match self {
            Self::Api { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.code),
            _ => None,
        }
    }

    /// Whether the error means the target message was already deleted by someone else.
    pub fn is_unknown_message(&self) -> bool {
        self.code() == Some(UNKNOWN_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: StatusCode, body: &str) -> DiscordError {
        DiscordError::Api {
            method: Method::DELETE,
            path: "/channels/1/messages/2".to_string(),
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn reads_unknown_message_code() {
        let err = api_error(
            StatusCode::NOT_FOUND,
            r#"{"message": "Unknown Message", "code": 10008}"#,
        );

        assert_eq!(err.code(), Some(UNKNOWN_MESSAGE));
        assert!(err.is_unknown_message());
    }

    #[test]
    fn other_codes_are_not_unknown_message() {
        let err = api_error(
            StatusCode::FORBIDDEN,
            r#"{"message": "Missing Permissions", "code": 50013}"#,
        );

        assert_eq!(err.code(), Some(50013));
        assert!(!err.is_unknown_message());
    }

    #[test]
    fn non_json_body_has_no_code() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");

        assert_eq!(err.code(), None);
        assert!(err.to_string().contains("502 Bad Gateway"));
    }
}
