//! Shadow state store — the canonical, merged state document of one device.
//!
//! Reported state arrives through [`ShadowStateStore::apply_reported`] or
//! [`ShadowStateStore::apply_reported_version`]; local patches go through
//! [`StateStore::update`], which forwards them to the [`ShadowTransport`] and
//! merges them once the transport accepted them. Every merge publishes a full
//! snapshot, in merge order.
//!
//! When the shadow versions its changes, a reported change is only merged if
//! it is newer than the last version the store applied, so the echo of an
//! already merged local patch cannot roll state back.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hatchlink_domain::error::HatchError;
use hatchlink_domain::state::merge_document;

use crate::observable::{Observable, Subject};
use crate::ports::{ShadowTransport, ShadowVersion, StateStore};

#[derive(Default)]
struct Shadow {
    document: Option<serde_json::Value>,
    version: Option<ShadowVersion>,
}

/// State store backed by a device shadow.
pub struct ShadowStateStore<T> {
    thing_name: String,
    transport: T,
    shadow: Mutex<Shadow>,
    state: Subject<Arc<serde_json::Value>>,
}

impl<T: ShadowTransport> ShadowStateStore<T> {
    /// Create an empty store for the shadow named `thing_name`.
    pub fn new(thing_name: impl Into<String>, transport: T) -> Self {
        Self {
            thing_name: thing_name.into(),
            transport,
            shadow: Mutex::new(Shadow::default()),
            state: Subject::new(),
        }
    }

    /// Name of the shadow this store mirrors.
    #[must_use]
    pub fn thing_name(&self) -> &str {
        &self.thing_name
    }

    /// Merge a reported (possibly partial) document received from the shadow.
    pub fn apply_reported(&self, partial: &serde_json::Value) {
        tracing::trace!(thing = %self.thing_name, "merging reported state");
        self.merge(partial, None);
    }

    /// Merge a reported change carrying the shadow's version.
    ///
    /// Returns `false` when the change is not newer than the last applied
    /// version and was dropped.
    pub fn apply_reported_version(
        &self,
        version: ShadowVersion,
        partial: &serde_json::Value,
    ) -> bool {
        let applied = self.merge(partial, Some(version));
        if applied {
            tracing::trace!(thing = %self.thing_name, version, "merged reported state");
        } else {
            tracing::trace!(thing = %self.thing_name, version, "dropping stale reported state");
        }
        applied
    }

    /// The latest merged document, if any has been received.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<serde_json::Value>> {
        self.state.observable().latest()
    }

    /// Last shadow version merged into the document.
    #[must_use]
    pub fn version(&self) -> Option<ShadowVersion> {
        self.lock().version
    }

    fn lock(&self) -> MutexGuard<'_, Shadow> {
        self.shadow.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn merge(&self, partial: &serde_json::Value, version: Option<ShadowVersion>) -> bool {
        let must_flush = {
            let mut shadow = self.lock();
            if let Some(version) = version {
                if shadow.version.is_some_and(|last| version <= last) {
                    return false;
                }
                shadow.version = Some(version);
            }
            let merged = shadow
                .document
                .get_or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            merge_document(merged, partial);
            // queued under the shadow lock so snapshots go out in merge order
            self.state.enqueue(Arc::new(merged.clone()))
        };
        if must_flush {
            self.state.flush();
        }
        true
    }
}

impl<T: ShadowTransport> StateStore for ShadowStateStore<T> {
    fn observe_state(&self) -> Observable<Arc<serde_json::Value>> {
        self.state.observable()
    }

    async fn update(&self, partial: serde_json::Value) -> Result<(), HatchError> {
        tracing::debug!(thing = %self.thing_name, patch = %partial, "sending state patch");
        let version = self
            .transport
            .publish_desired(&self.thing_name, partial.clone())
            .await?;
        if !self.merge(&partial, version) {
            tracing::debug!(thing = %self.thing_name, ?version, "newer state already merged");
        }
        Ok(())
    }
}
