//! # hatchlink-adapter-rest-reqwest
//!
//! [`RestClient`](hatchlink_app::ports::RestClient) implementation backed by
//! [reqwest](https://docs.rs/reqwest).
//!
//! The cloud API wraps every payload in an envelope:
//!
//! ```json
//! { "success": true, "payload": [ ... ], "errorMessage": null }
//! ```
//!
//! The adapter checks the HTTP status and the `success` flag, then decodes
//! `payload` into the type the caller asked for.
//!
//! ## Dependency rule
//!
//! Depends on `hatchlink-app` (port traits) and `hatchlink-domain` only.

mod client;
mod config;
mod error;

pub use client::ReqwestRestClient;
pub use config::RestConfig;
pub use error::RestError;
