//! reqwest-backed [`RestClient`].

use serde::Deserialize;
use serde::de::DeserializeOwned;

use hatchlink_app::ports::{RestClient, RestMethod, RestRequest};
use hatchlink_domain::error::HatchError;

use crate::config::RestConfig;
use crate::error::RestError;

const AUTH_HEADER: &str = "X-HatchBaby-Auth";

/// Response envelope shared by every API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    payload: serde_json::Value,
    #[serde(default)]
    error_message: Option<String>,
}

/// REST client for the cloud API.
#[derive(Debug, Clone)]
pub struct ReqwestRestClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
    auth_token: Option<String>,
}

impl ReqwestRestClient {
    /// Build a client from `config`.
    ///
    /// A trailing `/` is added to the base URL so request paths are appended
    /// to it rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidUrl`] for an unparsable base URL and
    /// [`RestError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &RestConfig) -> Result<Self, RestError> {
        let mut raw = config.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = reqwest::Url::parse(&raw).map_err(|err| RestError::InvalidUrl {
            url: raw.clone(),
            reason: err.to_string(),
        })?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(RestError::Http)?;

        Ok(Self {
            http,
            base_url,
            auth_token: config.auth_token.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &reqwest::Url {
        &self.base_url
    }

    async fn send<T: DeserializeOwned>(&self, request: RestRequest) -> Result<T, RestError> {
        let url = self
            .base_url
            .join(&request.url)
            .map_err(|err| RestError::InvalidUrl {
                url: request.url.clone(),
                reason: err.to_string(),
            })?;
        let method = match request.method {
            RestMethod::Get => reqwest::Method::GET,
        };
        tracing::debug!(%method, %url, "sending REST request");

        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.auth_token {
            builder = builder.header(AUTH_HEADER, token);
        }
        let response = builder.send().await.map_err(RestError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RestError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(RestError::Http)?;
        let envelope: Envelope = serde_json::from_slice(&body).map_err(RestError::Decode)?;
        if !envelope.success {
            return Err(RestError::Api {
                message: envelope
                    .error_message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }
        serde_json::from_value(envelope.payload).map_err(RestError::Decode)
    }
}

impl RestClient for ReqwestRestClient {
    async fn request<T: DeserializeOwned + Send>(
        &self,
        request: RestRequest,
    ) -> Result<T, HatchError> {
        let path = request.url.clone();
        self.send(request).await.map_err(|err| {
            tracing::warn!(%path, %err, "REST request failed");
            HatchError::from(err)
        })
    }
}
