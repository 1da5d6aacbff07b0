//! Persistence collaborator boundary.
//!
//! The core treats persistence as an external collaborator: it only
//! requires that each turn record and the finished-game signal can be
//! durably stored. A failure here is fatal to the enclosing command,
//! since round and turn numbers are externally observable truth.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::PlayerId;

/// Unique identifier for a game.
pub type GameId = u64;

/// One player-turn as seen by the persistence collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Game this turn belongs to.
    pub game_id: GameId,
    /// Player whose turn was processed.
    pub player: PlayerId,
    /// Round number the turn occurred in.
    pub round: u32,
    /// Player gold after income resolution.
    pub gold: i32,
    /// Player territory count at the time of recording.
    pub territory: i32,
}

/// A single line in a game record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordEntry {
    /// A processed player turn.
    Turn(TurnRecord),
    /// The game has finished.
    Finished {
        /// Game that finished.
        game_id: GameId,
    },
}

/// Failure reported by a recorder implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// Description of the failure.
    pub message: String,
}

impl RecordError {
    /// Create a new record error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record error: {}", self.message)
    }
}

impl std::error::Error for RecordError {}

/// Minimal contract the turn engine requires from persistence.
pub trait TurnRecorder {
    /// Durably record one processed player turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be stored; the engine
    /// treats this as fatal to the triggering command.
    fn record_turn(&mut self, record: &TurnRecord) -> Result<(), RecordError>;

    /// Durably record that the game has finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the signal could not be stored.
    fn record_game_finished(&mut self, game_id: GameId) -> Result<(), RecordError>;
}

/// In-memory recorder for tests and inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    /// Recorded turns, in emission order.
    pub turns: Vec<TurnRecord>,
    /// Finished-game signals, in emission order.
    pub finished: Vec<GameId>,
}

impl MemoryRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TurnRecorder for MemoryRecorder {
    fn record_turn(&mut self, record: &TurnRecord) -> Result<(), RecordError> {
        self.turns.push(*record);
        Ok(())
    }

    fn record_game_finished(&mut self, game_id: GameId) -> Result<(), RecordError> {
        self.finished.push(game_id);
        Ok(())
    }
}

/// Recorder writing line-delimited JSON to a file.
#[derive(Debug)]
pub struct JsonlRecorder {
    writer: BufWriter<File>,
}

impl JsonlRecorder {
    /// Create (or truncate) a record file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, RecordError> {
        let file = File::create(path)
            .map_err(|e| RecordError::new(format!("create {}: {e}", path.display())))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write_entry(&mut self, entry: &RecordEntry) -> Result<(), RecordError> {
        let line = serde_json::to_string(entry)
            .map_err(|e| RecordError::new(format!("encode entry: {e}")))?;
        writeln!(self.writer, "{line}").map_err(|e| RecordError::new(format!("write: {e}")))?;
        // Flush per entry: the record must be durable before the
        // enclosing command claims completion.
        self.writer
            .flush()
            .map_err(|e| RecordError::new(format!("flush: {e}")))
    }
}

impl TurnRecorder for JsonlRecorder {
    fn record_turn(&mut self, record: &TurnRecord) -> Result<(), RecordError> {
        self.write_entry(&RecordEntry::Turn(*record))
    }

    fn record_game_finished(&mut self, game_id: GameId) -> Result<(), RecordError> {
        self.write_entry(&RecordEntry::Finished { game_id })
    }
}
