//! End-to-end tests for the full hatchlinkd stack.
//!
//! Each test wires the real adapters together: the reqwest REST client talks
//! to an in-process axum server bound to `127.0.0.1:0`, and the virtual shadow
//! echoes patches back into the shadow state store.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::routing::get;
use serde_json::json;

use hatchlink_adapter_rest_reqwest::{ReqwestRestClient, RestConfig};
use hatchlink_adapter_virtual::{VirtualShadow, initial_document, pump_reported};
use hatchlink_app::accessory::LightAccessory;
use hatchlink_app::services::rest_iot::RestIot;
use hatchlink_app::state_store::ShadowStateStore;
use hatchlink_domain::color::HsbColor;
use hatchlink_domain::device::{IotDeviceInfo, Product};
use hatchlink_domain::error::HatchError;
use hatchlink_domain::percentage::from_percentage;

type Device = RestIot<Arc<ShadowStateStore<Arc<VirtualShadow>>>, ReqwestRestClient>;

struct Stack {
    shadow: Arc<VirtualShadow>,
    device: Arc<Device>,
}

async fn api(routines: serde_json::Value) -> String {
    let router = Router::new().route(
        "/service/app/routine/v2/fetch",
        get(move || {
            let routines = routines.clone();
            async move { Json(json!({ "success": true, "payload": routines })) }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/")
}

async fn stack(routines: serde_json::Value) -> Stack {
    let info = IotDeviceInfo {
        id: 1,
        name: "Nursery".to_string(),
        mac_address: "AA:BB:CC:DD:EE:FF".to_string(),
        thing_name: "rest-1".to_string(),
        product: Product::RestPlus2ndGen,
    };
    let rest_client = ReqwestRestClient::new(&RestConfig {
        base_url: api(routines).await,
        timeout_secs: 5,
        auth_token: None,
    })
    .unwrap();

    let (shadow, reported) = VirtualShadow::new();
    let shadow = Arc::new(shadow);
    let store = Arc::new(ShadowStateStore::new("rest-1", Arc::clone(&shadow)));
    store.apply_reported(&initial_document(&info));
    tokio::spawn({
        let store = Arc::clone(&store);
        async move { pump_reported(reported, &store).await }
    });

    let device = Arc::new(RestIot::new(info, store, rest_client));
    Stack { shadow, device }
}

#[tokio::test]
async fn should_expose_initial_properties() {
    let stack = stack(json!([])).await;

    assert_eq!(stack.device.model(), "Rest+ 2nd Gen");
    assert_eq!(stack.device.on_is_powered().latest(), Some(false));
    assert_eq!(stack.device.on_brightness().latest(), Some(0));
    assert_eq!(stack.device.on_battery_level().latest(), Some(100));
    assert_eq!(
        stack.device.on_firmware_version().latest().as_deref(),
        Some("4.1.0")
    );
}

#[tokio::test]
async fn should_power_on_with_first_touch_ring_routine() {
    let stack = stack(json!([
        { "id": 30, "displayOrder": 3, "type": "favorite" },
        { "id": 20, "displayOrder": 2, "type": "custom", "button0": true },
        { "id": 10, "displayOrder": 1, "type": "custom" }
    ]))
    .await;
    let powered = stack.device.on_is_powered();

    stack.device.set_power(true).await.unwrap();

    assert_eq!(
        stack.shadow.published(),
        vec![(
            "rest-1".to_string(),
            json!({ "current": { "playing": "routine", "step": 1, "srId": 20 } })
        )]
    );
    assert_eq!(powered.latest(), Some(true));

    stack.device.set_power(false).await.unwrap();
    assert_eq!(powered.latest(), Some(false));
}

#[tokio::test]
async fn should_fail_power_on_without_touch_ring_routine() {
    let stack = stack(json!([{ "id": 10, "displayOrder": 1, "type": "custom" }])).await;

    let result = stack.device.turn_on_routine().await;

    assert!(matches!(result, Err(HatchError::NoEligibleRoutine(_))));
    assert!(stack.shadow.published().is_empty());
}

#[tokio::test]
async fn should_send_one_debounced_color_from_accessory_writes() {
    let stack = stack(json!([])).await;
    let accessory = LightAccessory::new(
        Arc::clone(&stack.device),
        HsbColor::default(),
        Duration::from_millis(20),
    );

    accessory.set_hue(240);
    accessory.set_saturation(100);
    accessory.set_brightness(50);
    tokio::time::sleep(Duration::from_millis(200)).await;

    let published = stack.shadow.published();
    assert_eq!(published.len(), 1);
    assert_eq!(
        published[0].1,
        json!({ "current": { "color": {
            "r": 0, "g": 0, "b": 65535, "i": from_percentage(50)
        } } })
    );
    assert_eq!(accessory.on_brightness().latest(), Some(50));
    assert_eq!(accessory.on_hue().latest(), Some(240));
    assert_eq!(accessory.on_saturation().latest(), Some(100));
}
