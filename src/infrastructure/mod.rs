// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`simulated`]: In-memory engine with scriptable readiness and failures
//!   (implements [`EngineBootstrap`] and [`EngineHandle`])
//!
//! [`EngineBootstrap`]: crate::application::port::EngineBootstrap
//! [`EngineHandle`]: crate::application::port::EngineHandle

pub mod simulated;

pub use simulated::{CapabilityScript, EngineScript, SimulatedEngine, SimulatedHandle};
