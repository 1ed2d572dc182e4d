/// Pre-flight check failures. Raised before any network call, never
/// retried automatically; the message is shown to the operator as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("select at least one employee")]
    EmptySelection,
    #[error("absence reason is required")]
    MissingReason,
    #[error("permission start, end and reason are required")]
    MissingPermissionFields,
    #[error("attendance status has not been chosen")]
    IncompleteStatus,
    #[error("check-in and check-out times are required")]
    MissingTimes,
}

/// Shown when a failing response carries no usable message body.
pub const REMOTE_FALLBACK: &str = "operation failed";

#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No bearer credential available; the surrounding app routes the
    /// operator back to login.
    #[error("not authenticated")]
    Unauthenticated,

    /// Non-2xx response. `message` is the server's own text when the
    /// body had one.
    #[error("HTTP {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),
}

impl MarkerError {
    /// Operator-facing line for aggregate failure lists. Remote errors
    /// surface the server's message verbatim, without the status prefix.
    pub fn user_message(&self) -> String {
        match self {
            MarkerError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
