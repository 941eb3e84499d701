// SPDX-License-Identifier: MPL-2.0
//! Session lifecycle domain types.
//!
//! - [`SessionState`]: Viewer session state machine states
//! - [`LoadGeneration`]: Generation tag attached to every document load

mod state;

pub use state::{LoadGeneration, SessionState};
