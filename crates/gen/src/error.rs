//! Failure taxonomy for generation calls.
//!
//! The pipeline treats these classes differently: content rejection and
//! overload both fail the attempt but carry distinct user-facing
//! messages; authorization failures escalate to the credential
//! collaborator and abort batch runs; parse failures are retryable by
//! re-invoking the call.

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// The service refused the prompt as disallowed content.
    #[error("Content rejected by the generation service: {0}")]
    ContentRejected(String),

    /// The service is overloaded or rate limiting; retry later.
    #[error("Generation service overloaded: {0}")]
    Overloaded(String),

    /// Credentials missing, expired, or rejected.
    #[error("Generation service authorization failed: {0}")]
    Unauthorized(String),

    /// The service response could not be parsed into the expected shape.
    #[error("Malformed generation response: {0}")]
    Parse(String),

    /// Transport-level failure (connection, timeout, non-classified status).
    #[error("Generation request failed: {0}")]
    Transport(String),

    /// Local image decoding or cropping failed.
    #[error("Image processing failed: {0}")]
    Image(String),
}

impl GenError {
    /// Whether this failure must abort a batch run and escalate to the
    /// credential collaborator.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Message shown to the user when the attempt fails.
    ///
    /// Content rejection and overload share the failed status but are
    /// deliberately worded apart: one asks for a prompt edit, the other
    /// for a retry.
    pub fn user_message(&self) -> String {
        match self {
            Self::ContentRejected(_) => {
                "The prompt was rejected by the content policy. Edit the prompt and retry."
                    .to_string()
            }
            Self::Overloaded(_) => {
                "The generation service is busy. Retry in a moment.".to_string()
            }
            Self::Unauthorized(_) => "Generation credentials were rejected.".to_string(),
            Self::Parse(_) => {
                "The service returned an unreadable response. Retry the generation.".to_string()
            }
            Self::Transport(detail) => format!("Generation request failed: {detail}"),
            Self::Image(detail) => format!("Image processing failed: {detail}"),
        }
    }
}
