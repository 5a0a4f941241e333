use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Well-formed response carrying `success: false`. Holds the server message verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Not logged in - admin token is missing")]
    MissingToken,

    #[error("Unauthorized - token may be invalid")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server answered and said no.
    Logical,
    /// The call itself failed: connect, timeout, non-2xx, malformed body.
    Transport,
    /// The request was never sent.
    Local,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ApiError::Rejected(_) => FailureKind::Logical,
            ApiError::MissingToken => FailureKind::Local,
            _ => FailureKind::Transport,
        }
    }

    /// Text shown to the user in a toast.
    pub fn toast_message(&self) -> String {
        self.to_string()
    }
}
