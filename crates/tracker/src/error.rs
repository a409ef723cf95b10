use actors::actor::ActorError;
use model::ValidationError;

use crate::session::FinishReason;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Malformed input. The session was not modified.
    #[error("rejected input: {0}")]
    Validation(#[from] ValidationError),
    /// The session already finished. Calling into it is a caller bug.
    #[error("session already finished ({0:?})")]
    StaleSession(FinishReason),
    /// The actor owning the session is gone.
    #[error("session unavailable: {0}")]
    SessionUnavailable(#[from] ActorError),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
