// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Lugal: a deterministic turn engine for hex-based territorial conquest.
//!
//! This crate provides the simulation core of a turn-based conquest game
//! played on a hexagonal grid:
//! - Players place buildings and units and move units to capture cells
//! - Income accrues per turn; insolvency liquidates a player's army
//! - Players are eliminated when they run out of controlled territory
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Turn Engine                  │
//! ├──────────────┬──────────────────────┤
//! │ Territory    │ Reachability Search  │
//! │ Ledger       │                      │
//! ├──────────────┴──────────────────────┤
//! │   Hex Grid        Player Ledger     │
//! └─────────────────────────────────────┘
//! ```
//!
//! The engine is pure and synchronous: every command runs to completion
//! before the next is accepted, and persistence is an external
//! collaborator behind the [`record::TurnRecorder`] trait.

pub mod error;
pub mod game;
pub mod record;
pub mod worldgen;

pub use error::{EngineError, EngineResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Cell, CellType, Coord, GameObject, HexGrid, MarkerGrid, ObjectId, ObjectKind, PlayerId,
    PlayerState, TurnEngine, TurnState,
};
pub use record::{GameId, JsonlRecorder, MemoryRecorder, TurnRecord, TurnRecorder};
