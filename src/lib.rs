// SPDX-License-Identifier: MPL-2.0
//! `viewer_session` orchestrates an embeddable document viewer engine.
//!
//! It classifies documents, boots the engine against a host surface, loads
//! documents with generation tags so late engine events cannot act on a newer
//! document, and switches spreadsheets into edit mode once the engine's
//! editor has finished initializing.

#![doc(html_root_url = "https://docs.rs/viewer_session/0.3.0")]

pub mod application;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod session;
