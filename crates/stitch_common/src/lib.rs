//! Shared foundational types used across the stitch interconnect generator.
//!
//! This crate provides the internal-error result type used for contract
//! violations and the underscore-token helpers every port classifier relies on.

#![warn(missing_docs)]

pub mod naming;
pub mod result;

pub use naming::{has_token_run, tokens};
pub use result::{InternalError, StitchResult};
