//! # hatchlink-domain
//!
//! Pure domain model for the hatchlink device-control adapter.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, percentage scaling
//! - Define the **state document** schema reported by the device shadow
//!   (`current.*`, `deviceInfo.*`) and the partial patches sent back
//! - Define **colors** (HSB and RGB + intensity) and the conversions between them
//! - Define **routines** and the touch-ring selection rule
//! - Define **product variants** and their model/capability lookup table
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod percentage;

pub mod audio;
pub mod color;
pub mod device;
pub mod routine;
pub mod state;
