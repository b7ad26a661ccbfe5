//! Light accessory bridge — binds a [`RestIot`] to a switch + lightbulb UI.
//!
//! The UI writes hue, saturation and brightness as three separate values.
//! The bridge keeps them in one [`HsbColor`] context and sends a single
//! `set_hsb` once the writes have been quiet for the debounce window.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use hatchlink_domain::color::HsbColor;
use hatchlink_domain::error::HatchError;

use crate::observable::Observable;
use crate::ports::{RestClient, StateStore};
use crate::services::rest_iot::RestIot;

/// Default quiet period before combined color writes are sent.
pub const DEFAULT_HSB_DEBOUNCE: Duration = Duration::from_millis(100);

/// UI-facing wrapper around one device.
///
/// Must be created inside a tokio runtime; the debounce task is aborted on drop.
pub struct LightAccessory<S, R> {
    device: Arc<RestIot<S, R>>,
    context: Arc<Mutex<HsbColor>>,
    hsb_changed: mpsc::UnboundedSender<()>,
    debounce_task: JoinHandle<()>,
}

impl<S, R> LightAccessory<S, R>
where
    S: StateStore + 'static,
    R: RestClient + 'static,
{
    /// Bind `device`, starting from the color last shown to the user.
    pub fn new(device: Arc<RestIot<S, R>>, initial: HsbColor, debounce: Duration) -> Self {
        let context = Arc::new(Mutex::new(initial));
        let (hsb_changed, rx) = mpsc::unbounded_channel();
        let debounce_task = tokio::spawn(send_debounced_hsb(
            Arc::clone(&device),
            Arc::clone(&context),
            rx,
            debounce,
        ));
        Self {
            device,
            context,
            hsb_changed,
            debounce_task,
        }
    }

    #[must_use]
    pub fn device(&self) -> &Arc<RestIot<S, R>> {
        &self.device
    }

    /// The color the UI last asked for.
    #[must_use]
    pub fn context(&self) -> HsbColor {
        *self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn on_power(&self) -> Observable<bool> {
        self.device.on_some_content_playing()
    }

    #[must_use]
    pub fn on_hue(&self) -> Observable<u16> {
        self.device.on_hue()
    }

    #[must_use]
    pub fn on_saturation(&self) -> Observable<u8> {
        self.device.on_saturation()
    }

    /// Device brightness, or the context's brightness until the device reports one.
    #[must_use]
    pub fn on_brightness(&self) -> Observable<u8> {
        self.device.on_brightness().start_with(self.context().b)
    }

    /// Switch written by the user.
    ///
    /// # Errors
    ///
    /// Propagates the error of [`RestIot::set_power`].
    pub async fn set_on(&self, on: bool) -> Result<(), HatchError> {
        let name = &self.device.info().name;
        if on {
            tracing::info!(device = %name, "turning on first routine");
        } else {
            tracing::info!(device = %name, "turning off");
        }
        self.device.set_power(on).await
    }

    pub fn set_hue(&self, hue: u16) {
        self.edit(|hsb| hsb.h = hue);
    }

    pub fn set_saturation(&self, saturation: u8) {
        self.edit(|hsb| hsb.s = saturation);
    }

    pub fn set_brightness(&self, brightness: u8) {
        self.edit(|hsb| hsb.b = brightness);
    }

    fn edit(&self, apply: impl FnOnce(&mut HsbColor)) {
        apply(&mut self.context.lock().unwrap_or_else(PoisonError::into_inner));
        if self.hsb_changed.send(()).is_err() {
            tracing::warn!(device = %self.device.info().name, "color debounce task is gone");
        }
    }
}

impl<S, R> Drop for LightAccessory<S, R> {
    fn drop(&mut self) {
        self.debounce_task.abort();
    }
}

async fn send_debounced_hsb<S, R>(
    device: Arc<RestIot<S, R>>,
    context: Arc<Mutex<HsbColor>>,
    mut rx: mpsc::UnboundedReceiver<()>,
    window: Duration,
) where
    S: StateStore,
    R: RestClient,
{
    while rx.recv().await.is_some() {
        // wait until no write arrived for a full window
        while let Ok(Some(())) = tokio::time::timeout(window, rx.recv()).await {}

        let hsb = *context.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = device.set_hsb(hsb).await {
            tracing::warn!(device = %device.info().name, ?hsb, %err, "failed to set color");
        }
    }
}
