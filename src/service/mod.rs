//! Cloudinary service client
//!
//! [`Service`] holds the account configuration, an HTTP client and an
//! optional change tracker. Uploads live in `upload`, listing and
//! destructive operations in `admin`.

pub mod admin;
pub mod client;
pub mod models;
pub mod upload;

pub use client::{Service, ServiceConfig, DEFAULT_API_BASE, DEFAULT_MAX_RESULTS, DEFAULT_RESOURCE_BASE};
pub use models::*;
