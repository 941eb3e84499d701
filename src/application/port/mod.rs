// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines the abstract viewer engine boundary. Adapters for a
//! real embeddable engine, or the in-memory simulation in
//! [`crate::infrastructure::simulated`], implement these traits.
//!
//! # Design Notes
//!
//! - Traits use domain types only
//! - The session runs on a single thread, so futures are not required to be `Send`
//! - Engine events travel through a channel and carry the [`LoadGeneration`]
//!   of the request that produced them
//!
//! [`LoadGeneration`]: crate::domain::session::LoadGeneration

pub mod engine;

pub use engine::{
    DocumentPayload, EditModeManager, EngineBootstrap, EngineError, EngineEvent, EngineHandle,
    EngineOptions, LoadRequest, SurfaceHandle,
};
