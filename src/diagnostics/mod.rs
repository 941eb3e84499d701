// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for recording session activity.
//!
//! Orchestrator and sequencer handlers log a structured record
//! `{stage, attempt, cause}` for every notable step. Records go to `tracing`
//! and into a memory-bounded journal that hosts can inspect or export.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`JournalEntry`]: One structured record
//! - [`SessionJournal`]: Sink that emits and stores records

mod buffer;
mod events;
mod journal;

pub use buffer::{CircularBuffer, JournalCapacity};
pub use events::{JournalEntry, Severity, Stage};
pub use journal::SessionJournal;
