//! State store port — the device adapter's view of the canonical state.

use std::future::Future;
use std::sync::Arc;

use hatchlink_domain::error::HatchError;

use crate::observable::Observable;

/// Holds the latest merged state document of one device.
pub trait StateStore: Send + Sync {
    /// Stream of full state documents.
    ///
    /// New subscribers receive the latest document immediately (if any has
    /// arrived yet), then every later one in merge order.
    fn observe_state(&self) -> Observable<Arc<serde_json::Value>>;

    /// Send a partial state document to the device and merge it locally.
    fn update(
        &self,
        partial: serde_json::Value,
    ) -> impl Future<Output = Result<(), HatchError>> + Send;
}

impl<S: StateStore> StateStore for Arc<S> {
    fn observe_state(&self) -> Observable<Arc<serde_json::Value>> {
        (**self).observe_state()
    }

    fn update(
        &self,
        partial: serde_json::Value,
    ) -> impl Future<Output = Result<(), HatchError>> + Send {
        (**self).update(partial)
    }
}
