//! Request authentication for the Cloudinary API
//!
//! Upload, destroy and rename calls are authenticated by a SHA-1 signature
//! computed over the request parameters and the account's API secret.
//! Admin API calls use HTTP basic auth and are handled in the service module.

pub mod signer;

pub use signer::*;
