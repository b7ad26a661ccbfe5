//! REST port — requests against the cloud HTTP API.
//!
//! Authentication, base URL and response envelopes are the adapter's concern;
//! callers only describe the path and method and get the decoded payload back.

use std::future::Future;

use serde::de::DeserializeOwned;

use hatchlink_domain::error::HatchError;

/// HTTP method of a [`RestRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestMethod {
    Get,
}

/// A request relative to the API root, e.g. `service/app/routine/v2/fetch?macAddress=…`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    pub url: String,
    pub method: RestMethod,
}

impl RestRequest {
    /// Build a `GET` request for the given API path.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: RestMethod::Get,
        }
    }
}

/// Issues requests against the cloud REST API.
///
/// Implementations do not retry; failures surface as [`HatchError::Rest`].
pub trait RestClient: Send + Sync {
    /// Send `request` and decode the response payload as `T`.
    fn request<T: DeserializeOwned + Send>(
        &self,
        request: RestRequest,
    ) -> impl Future<Output = Result<T, HatchError>> + Send;
}

impl<C: RestClient> RestClient for std::sync::Arc<C> {
    fn request<T: DeserializeOwned + Send>(
        &self,
        request: RestRequest,
    ) -> impl Future<Output = Result<T, HatchError>> + Send {
        (**self).request(request)
    }
}
