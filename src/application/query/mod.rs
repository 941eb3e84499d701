// SPDX-License-Identifier: MPL-2.0
//! Query services (read-side).
//!
//! - [`catalog`]: Static registry of selectable sample and gallery documents

pub mod catalog;

pub use catalog::SampleCatalog;
