use shotflow_core::error::CoreError;
use shotflow_store::StoreError;

/// Error type for all pipeline operations.
///
/// Generation-service failures are split by how callers must react:
/// [`PipelineError::Generation`] is terminal for the attempt but batch
/// runs continue past it; [`PipelineError::Authorization`] aborts a batch
/// and is surfaced; [`PipelineError::CredentialsHandled`] aborts without
/// surfacing a failure message (the credential collaborator already
/// handled it).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The generation attempt failed; the unit's status is already
    /// `Failed` and a render event has been recorded.
    #[error("{message}")]
    Generation { message: String },

    /// Authorization failed and the credential collaborator did not
    /// handle it.
    #[error("{message}")]
    Authorization { message: String },

    /// Authorization failed and the credential collaborator handled it;
    /// the operation aborted without a user-facing failure.
    #[error("Operation aborted after credential recovery")]
    CredentialsHandled,
}

pub type PipelineResult<T> = Result<T, PipelineError>;
