//! Utility functions module
//!
//! This module contains public id derivation, HTTP client construction,
//! and table formatting helpers.

pub mod format;
pub mod naming;
pub mod network;

pub use format::*;
pub use naming::*;
pub use network::*;
