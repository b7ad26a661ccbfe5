//! # hatchlink-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ShadowTransport` — forward desired-state patches to the device shadow
//!   - `RestClient` — issue requests against the cloud REST API
//!   - `StateStore` — hold the merged device state and accept patches
//! - Provide **in-process infrastructure** that doesn't need IO:
//!   - `Observable` / `Subject` — replay-latest, push-based property streams
//!   - `ShadowStateStore` — the canonical state document of one device
//! - Define the **device adapter** (`RestIot`): derived properties and commands
//! - Define the **light accessory bridge** that batches UI color edits
//!
//! ## Dependency rule
//! Depends on `hatchlink-domain` only (plus `tokio` for sync primitives and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod accessory;
pub mod observable;
pub mod ports;
pub mod services;
pub mod state_store;
