// SPDX-License-Identifier: MPL-2.0
//! Editor activation domain types.
//!
//! - [`BackoffDelay`]: Wait between two capability queries
//! - [`ActivationDeadline`]: Total time budget of one activation run
//! - [`ActivationAttempt`]: Record of a single query/activation attempt
//! - [`EditMode`] and [`ViewerMode`]: Engine-defined mode identifiers

mod newtypes;

pub use newtypes::{
    activation_deadline_bounds, backoff_delay_bounds, ActivationAttempt, ActivationDeadline,
    BackoffDelay, EditMode, ViewerMode,
};
