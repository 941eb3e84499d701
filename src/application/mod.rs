// SPDX-License-Identifier: MPL-2.0
//! Application layer - Ports and read-side services.
//!
//! - [`port`]: Trait definitions (interfaces) for the viewer engine
//! - [`query`]: Query services (document catalog)
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The session orchestrator drives the ports
//!
//! # Example
//!
//! ```ignore
//! use viewer_session::application::port::{EngineBootstrap, EngineHandle};
//! use viewer_session::application::query::SampleCatalog;
//!
//! // Infrastructure implements the port trait
//! struct BrowserEngine { /* ... */ }
//! impl EngineBootstrap for BrowserEngine { /* ... */ }
//!
//! let catalog = SampleCatalog::builtin();
//! ```

pub mod port;
pub mod query;
