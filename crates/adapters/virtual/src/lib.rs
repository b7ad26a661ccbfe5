//! # hatchlink-adapter-virtual
//!
//! Simulated device shadow for demos and tests.
//!
//! [`VirtualShadow`] implements [`ShadowTransport`]: every desired-state patch
//! is recorded and echoed back, as a real device would after applying it, on
//! the [`ReportedReceiver`] handed out at construction. [`pump_reported`]
//! feeds that channel into a [`ShadowStateStore`].
//!
//! Every accepted patch and every device-side report gets the next shadow
//! version, so the store can drop echoes it has already merged.
//!
//! ## Dependency rule
//!
//! Depends on `hatchlink-app` (port traits) and `hatchlink-domain` only.

mod error;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::json;
use tokio::sync::mpsc;

use hatchlink_app::ports::{ShadowTransport, ShadowVersion};
use hatchlink_app::state_store::ShadowStateStore;
use hatchlink_domain::device::IotDeviceInfo;
use hatchlink_domain::error::HatchError;

pub use error::VirtualError;

/// Number of accepted patches kept for [`VirtualShadow::published`].
pub const HISTORY_LIMIT: usize = 32;

/// A partial document reported by the simulated device.
#[derive(Debug, Clone, PartialEq)]
pub struct Reported {
    /// Shadow version the change was assigned.
    pub version: ShadowVersion,
    pub partial: serde_json::Value,
}

/// Reported changes coming back from the simulated device.
pub type ReportedReceiver = mpsc::UnboundedReceiver<Reported>;

#[derive(Default)]
struct Log {
    version: ShadowVersion,
    published: VecDeque<(String, serde_json::Value)>,
}

/// A simulated device shadow.
pub struct VirtualShadow {
    reported: mpsc::UnboundedSender<Reported>,
    log: Mutex<Log>,
    online: AtomicBool,
}

impl VirtualShadow {
    /// Create an online shadow and the receiving end of its reported state.
    #[must_use]
    pub fn new() -> (Self, ReportedReceiver) {
        let (reported, rx) = mpsc::unbounded_channel();
        let shadow = Self {
            reported,
            log: Mutex::new(Log::default()),
            online: AtomicBool::new(true),
        };
        (shadow, rx)
    }

    /// Switch the simulated device on- or offline. Offline devices reject patches.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// The last [`HISTORY_LIMIT`] accepted patches, oldest first, with the
    /// shadow each was addressed to.
    #[must_use]
    pub fn published(&self) -> Vec<(String, serde_json::Value)> {
        self.lock().published.iter().cloned().collect()
    }

    /// Version of the latest change, `0` before any.
    #[must_use]
    pub fn version(&self) -> ShadowVersion {
        self.lock().version
    }

    fn lock(&self) -> MutexGuard<'_, Log> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Versions are assigned and sent under the log lock so the channel
    // carries them in increasing order.
    fn send(
        &self,
        log: &mut Log,
        partial: serde_json::Value,
    ) -> Result<ShadowVersion, VirtualError> {
        log.version += 1;
        let version = log.version;
        self.reported
            .send(Reported { version, partial })
            .map_err(|_| VirtualError::Closed)?;
        Ok(version)
    }

    /// Report a partial document as if the device changed on its own
    /// (touch ring pressed, battery drained, ...).
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::Closed`] once the receiver is dropped.
    pub fn report(&self, partial: serde_json::Value) -> Result<ShadowVersion, VirtualError> {
        let mut log = self.lock();
        self.send(&mut log, partial)
    }
}

/// Document of an idle device: nothing playing, light off.
///
/// Battery level is only present for products that have a battery.
#[must_use]
pub fn initial_document(info: &IotDeviceInfo) -> serde_json::Value {
    let mut device_info = json!({ "f": "4.1.0" });
    if info.product.traits().battery {
        device_info["fR"] = json!(100);
    }
    json!({
        "current": {
            "playing": "none",
            "step": 0,
            "srId": 0,
            "sound": { "v": 0, "id": 0 },
            "color": { "r": 0, "g": 0, "b": 0, "i": 0, "w": 0 }
        },
        "deviceInfo": device_info
    })
}

/// Apply every reported document to `store` until the channel closes.
pub async fn pump_reported<T: ShadowTransport>(
    mut reported: ReportedReceiver,
    store: &ShadowStateStore<T>,
) {
    while let Some(Reported { version, partial }) = reported.recv().await {
        store.apply_reported_version(version, &partial);
    }
    tracing::debug!(thing = %store.thing_name(), "reported state channel closed");
}

impl ShadowTransport for VirtualShadow {
    async fn publish_desired(
        &self,
        thing_name: &str,
        desired: serde_json::Value,
    ) -> Result<Option<ShadowVersion>, HatchError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(VirtualError::Offline(thing_name.to_string()).into());
        }
        let mut log = self.lock();
        let version = self.send(&mut log, desired.clone())?;
        tracing::debug!(thing = %thing_name, version, patch = %desired, "virtual shadow accepted patch");
        log.published.push_back((thing_name.to_string(), desired));
        if log.published.len() > HISTORY_LIMIT {
            log.published.pop_front();
        }
        Ok(Some(version))
    }
}
