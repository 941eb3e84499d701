// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core session types with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`activation`]: Editor activation types ([`BackoffDelay`](activation::BackoffDelay),
//!   [`ActivationDeadline`](activation::ActivationDeadline), [`EditMode`](activation::EditMode))
//! - [`diagnostics`]: Diagnostics types ([`JournalCapacity`](diagnostics::JournalCapacity))
//! - [`document`]: Document types ([`FileMetadata`](document::FileMetadata),
//!   [`DocumentKind`](document::DocumentKind))
//! - [`session`]: Session lifecycle types ([`SessionState`](session::SessionState),
//!   [`LoadGeneration`](session::LoadGeneration))

pub mod activation;
pub mod diagnostics;
pub mod document;
pub mod session;
