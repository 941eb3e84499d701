// SPDX-License-Identifier: MPL-2.0
//! Document domain types.
//!
//! - [`FileMetadata`]: Immutable description of a selectable document
//! - [`DocumentKind`]: Spreadsheet or generic document

mod types;

pub use types::{DocumentKind, FileMetadata};
