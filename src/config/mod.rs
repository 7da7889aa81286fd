//! Configuration management module
//!
//! Loads settings from a configuration file and environment variables and
//! turns them into a [`crate::service::ServiceConfig`].

pub mod settings;

pub use settings::*;
