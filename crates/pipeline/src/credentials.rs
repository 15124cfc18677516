//! Escalation seam for authorization failures.
//!
//! When a generation call fails with an authorization-class error, the
//! pipeline asks this collaborator whether it handled the failure (for
//! example by prompting the user for new credentials). A handled failure
//! aborts the in-flight operation or batch silently; an unhandled one is
//! surfaced as a generic failure.

use async_trait::async_trait;
use shotflow_gen::GenError;

use crate::error::PipelineError;

/// External credential-handling collaborator.
#[async_trait]
pub trait CredentialHandler: Send + Sync {
    /// Returns `true` when the failure was handled and the operation
    /// should abort without surfacing an error.
    async fn handle_unauthorized(&self, detail: &str) -> bool;
}

/// Default collaborator: never handles anything, so authorization
/// failures surface as generic failures.
#[derive(Debug, Default)]
pub struct NoopCredentialHandler;

#[async_trait]
impl CredentialHandler for NoopCredentialHandler {
    async fn handle_unauthorized(&self, detail: &str) -> bool {
        tracing::warn!(detail, "Authorization failure with no credential handler installed");
        false
    }
}

/// Classify a failed generation attempt for the caller.
///
/// Authorization-class failures are offered to the collaborator first;
/// everything else (content rejection, overload, parse, transport) is a
/// per-attempt [`PipelineError::Generation`].
pub(crate) async fn escalate(
    err: GenError,
    message: String,
    credentials: &dyn CredentialHandler,
) -> PipelineError {
    if err.is_authorization() {
        if credentials.handle_unauthorized(&err.to_string()).await {
            return PipelineError::CredentialsHandled;
        }
        return PipelineError::Authorization { message };
    }
    PipelineError::Generation { message }
}
