//! Device state document — the typed view over the shadow JSON.
//!
//! The shadow is opaque JSON; only the fields below are interpreted. Every
//! field is defaulted so that a merged snapshot always decodes, and unknown
//! fields are ignored.
//!
//! Outgoing patches are built with [`StatePatch`], which only serializes the
//! fields that are set.

use serde::{Deserialize, Serialize};

use crate::audio::AudioTrack;
use crate::color::IotColor;

/// Full device state as held by the state store.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RestIotState {
    pub current: CurrentState,
    pub device_info: DeviceInfoState,
}

impl RestIotState {
    /// Decode the typed view from a merged shadow document.
    ///
    /// # Errors
    ///
    /// Returns the serde error if a known field has the wrong JSON type.
    pub fn from_document(document: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(document)
    }
}

/// What the device is currently doing.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrentState {
    pub playing: Playing,
    pub step: u32,
    pub sr_id: u64,
    pub sound: SoundState,
    pub color: IotColor,
}

/// Audio block: volume `v` in device units and the active track `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundState {
    pub v: u32,
    pub id: AudioTrack,
}

/// Firmware metadata reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DeviceInfoState {
    /// Firmware version.
    pub f: String,
    /// Battery level, already a percentage.
    #[serde(rename = "fR")]
    pub fr: u8,
}

/// Playback marker of the `current` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Playing {
    /// Nothing is playing; the device is considered off.
    #[default]
    None,
    Routine,
    Remote,
    BedtimeStep,
    /// Any marker this version does not know about.
    #[serde(other)]
    Unknown,
}

impl Playing {
    /// Whether some content (routine, step, remote session) is active.
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Partial state update sent to the device.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StatePatch {
    pub current: CurrentPatch,
}

/// Partial `current` block; unset fields are omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playing: Option<Playing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sr_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorPatch>,
}

/// Color written by `set_hsb`: RGB ratios plus intensity, never white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPatch {
    pub r: u32,
    pub g: u32,
    pub b: u32,
    pub i: u32,
}

impl StatePatch {
    /// Patch selecting what plays: `current = { playing, step, srId }`.
    #[must_use]
    pub fn playing(playing: Playing, step: u32, sr_id: u64) -> Self {
        Self {
            current: CurrentPatch {
                playing: Some(playing),
                step: Some(step),
                sr_id: Some(sr_id),
                color: None,
            },
        }
    }

    /// Patch setting `current.color`.
    #[must_use]
    pub fn color(color: ColorPatch) -> Self {
        Self {
            current: CurrentPatch {
                color: Some(color),
                ..CurrentPatch::default()
            },
        }
    }

    /// Serialize into the JSON shape expected by the shadow.
    ///
    /// # Errors
    ///
    /// Returns the serde error if serialization fails.
    pub fn to_document(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Merge a partial shadow document into a full one.
///
/// Objects merge key by key, recursively. A `null` value deletes the key, so
/// the typed view falls back to the field's default. Any other value
/// replaces what was there before.
pub fn merge_document(target: &mut serde_json::Value, patch: &serde_json::Value) {
    let serde_json::Value::Object(patch) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = serde_json::Value::Object(serde_json::Map::new());
    }
    if let serde_json::Value::Object(target) = target {
        for (key, value) in patch {
            if value.is_null() {
                target.remove(key);
            } else {
                let slot = target
                    .entry(key.clone())
                    .or_insert(serde_json::Value::Null);
                merge_document(slot, value);
            }
        }
    }
}
