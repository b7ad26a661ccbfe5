//! Rest IoT device adapter — derived properties and commands.
//!
//! Every property is a projection of the latest state document, recomputed
//! for each new document and only emitted when its value changes. Hue and
//! saturation both come from the same per-document HSB conversion.
//!
//! Commands build partial state patches and hand them to the [`StateStore`].

use std::sync::Arc;

use hatchlink_domain::audio::{AUDIO_TRACKS, AudioTrack};
use hatchlink_domain::color::{HsbColor, hsb_to_rgb, rgb_to_hsb};
use hatchlink_domain::device::{IotDeviceInfo, ProductTraits};
use hatchlink_domain::error::{HatchError, NoEligibleRoutineError, ValidationError};
use hatchlink_domain::percentage::{MAX_IOT_VALUE, from_percentage, to_percentage};
use hatchlink_domain::routine::Routine;
use hatchlink_domain::state::{ColorPatch, Playing, RestIotState, StatePatch};

use crate::observable::Observable;
use crate::ports::{RestClient, StateStore};
use crate::services::routine_service::RoutineService;

/// Adapter for the Rest 2nd Gen / Rest+ 2nd Gen / Restore IoT family.
pub struct RestIot<S, R> {
    info: IotDeviceInfo,
    store: S,
    routines: RoutineService<R>,
    /// Serialises power-on so two concurrent calls cannot interleave their
    /// fetch and patch.
    power_on: tokio::sync::Mutex<()>,
    properties: Properties,
}

struct Properties {
    some_content_playing: Observable<bool>,
    firmware_version: Observable<String>,
    volume: Observable<u8>,
    audio_track: Observable<AudioTrack>,
    audio_playing: Observable<bool>,
    is_powered: Observable<bool>,
    brightness: Observable<u8>,
    hsb: Observable<HsbColor>,
    hue: Observable<u16>,
    saturation: Observable<u8>,
    battery_level: Observable<u8>,
}

impl Properties {
    fn derive(info: &IotDeviceInfo, documents: &Observable<Arc<serde_json::Value>>) -> Self {
        let device = info.name.clone();
        let state = documents.filter_map(move |document| {
            match RestIotState::from_document(document) {
                Ok(state) => Some(state),
                Err(err) => {
                    tracing::warn!(%device, %err, "ignoring undecodable state document");
                    None
                }
            }
        });

        let audio_track = state
            .map(|s: &RestIotState| s.current.sound.id)
            .distinct_until_changed();
        let hsb = state
            .map(|s: &RestIotState| rgb_to_hsb(s.current.color.rgb(), MAX_IOT_VALUE))
            .distinct_until_changed();

        Self {
            some_content_playing: state
                .map(|s: &RestIotState| s.current.playing.is_active())
                .distinct_until_changed(),
            firmware_version: state
                .map(|s: &RestIotState| s.device_info.f.clone())
                .distinct_until_changed(),
            volume: state
                .map(|s: &RestIotState| to_percentage(s.current.sound.v))
                .distinct_until_changed(),
            audio_playing: audio_track
                .map(|track: &AudioTrack| track.is_playing())
                .distinct_until_changed(),
            audio_track,
            is_powered: state
                .map(|s: &RestIotState| s.current.playing != Playing::None)
                .distinct_until_changed(),
            brightness: state.map(brightness_of).distinct_until_changed(),
            hue: hsb.map(|c: &HsbColor| c.h).distinct_until_changed(),
            saturation: hsb.map(|c: &HsbColor| c.s).distinct_until_changed(),
            hsb,
            battery_level: state
                .map(|s: &RestIotState| s.device_info.fr)
                .distinct_until_changed(),
        }
    }
}

fn brightness_of(state: &RestIotState) -> u8 {
    let color = &state.current.color;
    if color.is_no_color() {
        0
    } else {
        to_percentage(color.i)
    }
}

impl<S: StateStore, R: RestClient> RestIot<S, R> {
    /// Wire the adapter to its state store and REST client.
    ///
    /// Properties start emitting as soon as the store holds a document.
    pub fn new(info: IotDeviceInfo, store: S, rest_client: R) -> Self {
        let properties = Properties::derive(&info, &store.observe_state());
        Self {
            info,
            store,
            routines: RoutineService::new(rest_client),
            power_on: tokio::sync::Mutex::new(()),
            properties,
        }
    }

    #[must_use]
    pub fn info(&self) -> &IotDeviceInfo {
        &self.info
    }

    /// Human-readable model name of the product variant.
    #[must_use]
    pub fn model(&self) -> &'static str {
        self.info.product.model()
    }

    #[must_use]
    pub fn capabilities(&self) -> &'static ProductTraits {
        self.info.product.traits()
    }

    /// Tracks the device can play.
    #[must_use]
    pub fn audio_tracks(&self) -> &'static [(AudioTrack, &'static str)] {
        AUDIO_TRACKS
    }

    /// Whether a routine, step or remote session is active.
    #[must_use]
    pub fn on_some_content_playing(&self) -> Observable<bool> {
        self.properties.some_content_playing.clone()
    }

    #[must_use]
    pub fn on_firmware_version(&self) -> Observable<String> {
        self.properties.firmware_version.clone()
    }

    /// Volume in percent.
    #[must_use]
    pub fn on_volume(&self) -> Observable<u8> {
        self.properties.volume.clone()
    }

    #[must_use]
    pub fn on_audio_track(&self) -> Observable<AudioTrack> {
        self.properties.audio_track.clone()
    }

    #[must_use]
    pub fn on_audio_playing(&self) -> Observable<bool> {
        self.properties.audio_playing.clone()
    }

    #[must_use]
    pub fn on_is_powered(&self) -> Observable<bool> {
        self.properties.is_powered.clone()
    }

    /// Brightness in percent; `0` while the "no color" option is selected.
    #[must_use]
    pub fn on_brightness(&self) -> Observable<u8> {
        self.properties.brightness.clone()
    }

    /// Hue and saturation of the light at full brightness.
    #[must_use]
    pub fn on_hsb(&self) -> Observable<HsbColor> {
        self.properties.hsb.clone()
    }

    #[must_use]
    pub fn on_hue(&self) -> Observable<u16> {
        self.properties.hue.clone()
    }

    #[must_use]
    pub fn on_saturation(&self) -> Observable<u8> {
        self.properties.saturation.clone()
    }

    /// Battery level in percent, as reported.
    #[must_use]
    pub fn on_battery_level(&self) -> Observable<u8> {
        self.properties.battery_level.clone()
    }

    /// Turn the device on (first touch-ring routine) or off.
    ///
    /// # Errors
    ///
    /// See [`Self::turn_on_routine`] and [`Self::turn_off`].
    pub async fn set_power(&self, on: bool) -> Result<(), HatchError> {
        if on {
            self.turn_on_routine().await
        } else {
            self.turn_off().await
        }
    }

    /// Start the first touch-ring routine.
    ///
    /// Nothing is patched until the routine choice is resolved.
    ///
    /// # Errors
    ///
    /// Returns [`HatchError::NoEligibleRoutine`] when the device has no
    /// touch-ring routine, a REST error when fetching fails, or a transport
    /// error when the patch cannot be sent.
    pub async fn turn_on_routine(&self) -> Result<(), HatchError> {
        let _guard = self.power_on.lock().await;

        let routines = self.fetch_routines().await?;
        let routine = routines.first().ok_or_else(|| NoEligibleRoutineError {
            mac_address: self.info.mac_address.clone(),
        })?;

        tracing::info!(
            device = %self.info.name,
            routine = routine.id,
            "starting first touch-ring routine"
        );
        self.set_current(Playing::Routine, 1, routine.id).await
    }

    /// Stop whatever is playing.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the patch cannot be sent.
    pub async fn turn_off(&self) -> Result<(), HatchError> {
        tracing::info!(device = %self.info.name, "turning off");
        self.set_current(Playing::None, 0, 0).await
    }

    /// Set the light color.
    ///
    /// RGB ratios are computed at full brightness; the requested brightness
    /// only goes into the intensity channel.
    ///
    /// # Errors
    ///
    /// Returns [`HatchError::Validation`] for out-of-range input, or a
    /// transport error when the patch cannot be sent.
    pub async fn set_hsb(&self, hsb: HsbColor) -> Result<(), HatchError> {
        validate_hsb(hsb)?;

        let rgb = hsb_to_rgb(HsbColor { b: 100, ..hsb }, MAX_IOT_VALUE);
        let patch = StatePatch::color(ColorPatch {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
            i: from_percentage(hsb.b),
        });
        tracing::debug!(device = %self.info.name, ?hsb, "setting color");
        self.store.update(patch.to_document()?).await
    }

    /// Remote volume control is not available on this device family.
    pub fn set_volume(&self, percentage: u8) {
        tracing::debug!(
            device = %self.info.name,
            percentage,
            "volume control is not supported, ignoring"
        );
    }

    /// Remote track selection is not available on this device family.
    pub fn set_audio_track(&self, track: AudioTrack) {
        tracing::debug!(
            device = %self.info.name,
            track = track.0,
            "audio track selection is not supported, ignoring"
        );
    }

    /// Stop audio when `playing` is false; starting audio goes through
    /// [`Self::set_audio_track`].
    pub fn set_audio_playing(&self, playing: bool) {
        if !playing {
            self.set_audio_track(AudioTrack::NONE);
        }
    }

    /// Touch-ring routines of this device, sorted by display order.
    ///
    /// # Errors
    ///
    /// Propagates the REST client's error.
    pub async fn fetch_routines(&self) -> Result<Vec<Routine>, HatchError> {
        self.routines
            .fetch_touch_ring_routines(&self.info.mac_address)
            .await
    }

    async fn set_current(
        &self,
        playing: Playing,
        step: u32,
        sr_id: u64,
    ) -> Result<(), HatchError> {
        let patch = StatePatch::playing(playing, step, sr_id);
        self.store.update(patch.to_document()?).await
    }
}

fn validate_hsb(hsb: HsbColor) -> Result<(), ValidationError> {
    if hsb.h > 360 {
        return Err(ValidationError::HueOutOfRange(hsb.h));
    }
    if hsb.s > 100 {
        return Err(ValidationError::SaturationOutOfRange(hsb.s));
    }
    if hsb.b > 100 {
        return Err(ValidationError::BrightnessOutOfRange(hsb.b));
    }
    Ok(())
}
