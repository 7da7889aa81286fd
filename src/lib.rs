//! cldsync - Cloudinary upload and sync library
//!
//! Uploads files, directory trees and remote URLs to Cloudinary with signed
//! requests, lists, renames and deletes remote resources, and optionally
//! records content checksums in MongoDB so unchanged files are not sent
//! twice.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod service;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use error::{CldsyncError, Result};
pub use service::{Service, ServiceConfig};
pub use tracker::ChangeTracker;
