//! Error types for the turn engine.

use std::fmt;

use crate::game::PlayerId;
use crate::record::RecordError;

/// Fatal engine errors.
///
/// Invalid coordinates and illegal moves are deliberately *not* errors:
/// read queries yield absent results and commands become no-ops. The
/// variants here signal consistency violations or a persistence failure
/// that must abort the enclosing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A player id was referenced during ownership resolution that is
    /// not present in the active-player mapping.
    UnknownPlayer(PlayerId),
    /// The persistence collaborator failed to record a turn or the
    /// finished-game signal.
    Record(RecordError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownPlayer(id) => {
                write!(f, "unknown player id {id} referenced during ownership resolution")
            }
            EngineError::Record(err) => write!(f, "turn record not persisted: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::UnknownPlayer(_) => None,
            EngineError::Record(err) => Some(err),
        }
    }
}

impl From<RecordError> for EngineError {
    fn from(err: RecordError) -> Self {
        EngineError::Record(err)
    }
}

/// Result type for engine commands.
pub type EngineResult<T> = Result<T, EngineError>;
