//! Gateway error taxonomy.
//!
//! Callers treat every failure as a single recoverable signal carrying a
//! user-facing message: the server's own message when one was supplied,
//! a generic fallback otherwise. There is no typed exception hierarchy
//! and no automatic retry.

/// Fallback when the server rejects an operation without a usable message.
pub const GENERIC_SERVER_MESSAGE: &str = "Something went wrong. Please try again.";

/// The one message shown for transport-level failures.
pub const GENERIC_NETWORK_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";

/// Errors from portal gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered and rejected the operation.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// No response at all (DNS, refused connection, timeout).
    #[error("{}", GENERIC_NETWORK_MESSAGE)]
    Network(#[source] reqwest::Error),
    /// A success response that could not be decoded into the expected shape.
    #[error("The server returned an unexpected response")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_server_message() {
        let err = ApiError::Server {
            status: 401,
            message: "Invalid credentials".into(),
        };
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn malformed_response_hides_detail_from_display() {
        let err = ApiError::MalformedResponse("missing field `token`".into());
        assert_eq!(err.to_string(), "The server returned an unexpected response");
    }
}
