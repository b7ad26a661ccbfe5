//! Routine service — fetch the routines that can be started from the touch ring.

use hatchlink_domain::error::HatchError;
use hatchlink_domain::routine::{Routine, touch_ring_routines};

use crate::ports::{RestClient, RestRequest};

const ROUTINES_PATH: &str = "service/app/routine/v2/fetch";

/// Application service for routine lookups.
pub struct RoutineService<R> {
    client: R,
}

impl<R: RestClient> RoutineService<R> {
    /// Create a new service backed by the given REST client.
    pub fn new(client: R) -> Self {
        Self { client }
    }

    /// Fetch the routines of the device with `mac_address`, sorted by
    /// display order and reduced to touch-ring routines.
    ///
    /// The list is fetched fresh on every call and may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`HatchError::Rest`] (or whatever the client reports) when the
    /// request fails. No retry happens here.
    pub async fn fetch_touch_ring_routines(
        &self,
        mac_address: &str,
    ) -> Result<Vec<Routine>, HatchError> {
        let url = format!(
            "{ROUTINES_PATH}?macAddress={}",
            urlencoding::encode(mac_address)
        );
        let all: Vec<Routine> = self.client.request(RestRequest::get(url)).await?;
        let total = all.len();
        let routines = touch_ring_routines(all);
        tracing::debug!(
            mac = mac_address,
            total,
            eligible = routines.len(),
            "fetched routines"
        );
        Ok(routines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RestMethod;
    use hatchlink_domain::routine::RoutineType;
    use serde::de::DeserializeOwned;
    use std::future::Future;
    use std::sync::Mutex;

    struct FixtureClient {
        body: serde_json::Value,
        requests: Mutex<Vec<RestRequest>>,
    }

    impl FixtureClient {
        fn new(body: serde_json::Value) -> Self {
            Self {
                body,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl RestClient for FixtureClient {
        fn request<T: DeserializeOwned + Send>(
            &self,
            request: RestRequest,
        ) -> impl Future<Output = Result<T, HatchError>> + Send {
            self.requests.lock().unwrap().push(request);
            let result = serde_json::from_value(self.body.clone()).map_err(HatchError::from);
            async { result }
        }
    }

    struct FailingClient;

    impl RestClient for FailingClient {
        fn request<T: DeserializeOwned + Send>(
            &self,
            _request: RestRequest,
        ) -> impl Future<Output = Result<T, HatchError>> + Send {
            async { Err(HatchError::Rest(Box::new(std::io::Error::other("502")))) }
        }
    }

    fn fixture() -> serde_json::Value {
        serde_json::json!([
            { "id": 1, "displayOrder": 2, "type": "favorite", "button0": false },
            { "id": 2, "displayOrder": 1, "type": "other", "button0": true },
            { "id": 3, "displayOrder": 3, "type": "other", "button0": false }
        ])
    }

    #[tokio::test]
    async fn should_return_sorted_touch_ring_routines() {
        let svc = RoutineService::new(FixtureClient::new(fixture()));
        let routines = svc
            .fetch_touch_ring_routines("AA:BB:CC:DD:EE:FF")
            .await
            .unwrap();

        assert_eq!(
            routines,
            vec![
                Routine {
                    id: 2,
                    display_order: 1,
                    kind: RoutineType::Other,
                    button0: true,
                },
                Routine {
                    id: 1,
                    display_order: 2,
                    kind: RoutineType::Favorite,
                    button0: false,
                },
            ]
        );
    }

    #[tokio::test]
    async fn should_request_url_encoded_mac_address() {
        let client = FixtureClient::new(serde_json::json!([]));
        let svc = RoutineService::new(client);
        svc.fetch_touch_ring_routines("AA:BB:CC:DD:EE:FF")
            .await
            .unwrap();

        let requests = svc.client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, RestMethod::Get);
        assert_eq!(
            requests[0].url,
            "service/app/routine/v2/fetch?macAddress=AA%3ABB%3ACC%3ADD%3AEE%3AFF"
        );
    }

    #[tokio::test]
    async fn should_return_empty_list_when_nothing_is_eligible() {
        let body = serde_json::json!([
            { "id": 3, "displayOrder": 3, "type": "other", "button0": false }
        ]);
        let svc = RoutineService::new(FixtureClient::new(body));
        let routines = svc.fetch_touch_ring_routines("mac").await.unwrap();
        assert!(routines.is_empty());
    }

    #[tokio::test]
    async fn should_propagate_rest_failure() {
        let svc = RoutineService::new(FailingClient);
        let result = svc.fetch_touch_ring_routines("mac").await;
        assert!(matches!(result, Err(HatchError::Rest(_))));
    }
}
