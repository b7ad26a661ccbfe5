//! # hatchlinkd — hatchlink daemon
//!
//! Composition root that wires the adapters to one Rest IoT device.
//!
//! ## Responsibilities
//! - Load configuration (`hatchlink.toml`, env vars)
//! - Initialise `tracing` with the configured filter
//! - Construct the REST client and the shadow transport (adapters)
//! - Construct the state store, the device adapter and the light accessory
//! - Log every property change until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::fmt::Debug;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hatchlink_adapter_rest_reqwest::ReqwestRestClient;
use hatchlink_adapter_virtual::{VirtualShadow, initial_document, pump_reported};
use hatchlink_app::accessory::LightAccessory;
use hatchlink_app::observable::{Observable, Subscription};
use hatchlink_app::ports::{RestClient, StateStore};
use hatchlink_app::services::rest_iot::RestIot;
use hatchlink_app::state_store::ShadowStateStore;
use hatchlink_domain::color::HsbColor;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let info = config.device_info();
    tracing::info!(
        device = %info.name,
        model = info.product.model(),
        thing = %info.thing_name,
        "hatchlinkd starting"
    );

    // Adapters
    let rest_client = ReqwestRestClient::new(&config.api)?;
    let (shadow, reported) = VirtualShadow::new();

    // State
    let store = Arc::new(ShadowStateStore::new(info.thing_name.clone(), shadow));
    store.apply_reported(&initial_document(&info));
    let pump = tokio::spawn({
        let store = Arc::clone(&store);
        async move { pump_reported(reported, &store).await }
    });

    // Device
    let device = Arc::new(RestIot::new(info, Arc::clone(&store), rest_client));
    let accessory = LightAccessory::new(
        Arc::clone(&device),
        HsbColor::default(),
        config.hsb_debounce(),
    );
    let _watches = watch_properties(&device, &accessory);

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    pump.abort();

    Ok(())
}

fn watch_properties<S, R>(
    device: &RestIot<S, R>,
    accessory: &LightAccessory<S, R>,
) -> Vec<Subscription>
where
    S: StateStore + 'static,
    R: RestClient + 'static,
{
    let name = device.info().name.as_str();
    let mut watches = vec![
        log_changes(name, "power", &accessory.on_power()),
        log_changes(name, "hue", &accessory.on_hue()),
        log_changes(name, "saturation", &accessory.on_saturation()),
        log_changes(name, "brightness", &accessory.on_brightness()),
        log_changes(name, "firmware_version", &device.on_firmware_version()),
        log_changes(name, "volume", &device.on_volume()),
        log_changes(name, "audio_track", &device.on_audio_track()),
        log_changes(name, "audio_playing", &device.on_audio_playing()),
    ];
    if device.capabilities().battery {
        watches.push(log_changes(name, "battery_level", &device.on_battery_level()));
    }
    watches
}

fn log_changes<T>(device: &str, property: &'static str, values: &Observable<T>) -> Subscription
where
    T: Debug + Clone + Send + Sync + 'static,
{
    let device = device.to_string();
    values.subscribe(move |value| {
        tracing::info!(%device, property, ?value, "property changed");
    })
}
