//! Shadow transport port — the outbound half of the shadow-sync protocol.
//!
//! The inbound half (reported state arriving from the device) is pushed into
//! [`ShadowStateStore::apply_reported`](crate::state_store::ShadowStateStore::apply_reported)
//! by whoever owns the connection.

use std::future::Future;

use hatchlink_domain::error::HatchError;

/// Version number a shadow assigns to every accepted change.
pub type ShadowVersion = u64;

/// Forwards desired-state patches to a device shadow.
pub trait ShadowTransport: Send + Sync {
    /// Publish `desired` (a partial state document) to the shadow named `thing_name`.
    ///
    /// Returns the version the shadow assigned to the change, or `None` when
    /// the shadow does not version its document.
    fn publish_desired(
        &self,
        thing_name: &str,
        desired: serde_json::Value,
    ) -> impl Future<Output = Result<Option<ShadowVersion>, HatchError>> + Send;
}

impl<T: ShadowTransport> ShadowTransport for std::sync::Arc<T> {
    fn publish_desired(
        &self,
        thing_name: &str,
        desired: serde_json::Value,
    ) -> impl Future<Output = Result<Option<ShadowVersion>, HatchError>> + Send {
        (**self).publish_desired(thing_name, desired)
    }
}
