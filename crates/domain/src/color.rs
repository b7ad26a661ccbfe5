//! Colors — HSB as shown by the UI, RGB + intensity as stored by the device.
//!
//! The conversions here are value-space transforms only. Brightness and
//! intensity are handled by the device adapter on top of them: hue and
//! saturation are always computed as if the light were at full brightness.

use serde::{Deserialize, Serialize};

/// Hue (degrees, `0..=360`), saturation and brightness (percent, `0..=100`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HsbColor {
    pub h: u16,
    pub s: u8,
    pub b: u8,
}

/// Plain RGB triple scaled to some channel maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

/// Color block of the device state: RGB, intensity `i` and white `w`.
///
/// Intensity is independent from the RGB ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IotColor {
    pub r: u32,
    pub g: u32,
    pub b: u32,
    pub i: u32,
    pub w: u32,
}

impl IotColor {
    /// The RGB part of the color, ignoring intensity and white.
    #[must_use]
    pub fn rgb(&self) -> RgbColor {
        RgbColor {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// Whether the "no color" option is selected in the vendor app.
    ///
    /// That option zeroes every color channel but leaves `i` untouched, so a
    /// non-zero intensity must not be read as the light being lit.
    #[must_use]
    pub fn is_no_color(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0 && self.w == 0
    }
}

/// Convert an HSB color into RGB channels in `0..=max_value`.
///
/// The white channel is never derived.
#[must_use]
pub fn hsb_to_rgb(hsb: HsbColor, max_value: u32) -> RgbColor {
    let hue = f64::from(hsb.h % 360) / 60.0;
    let saturation = f64::from(hsb.s.min(100)) / 100.0;
    let value = f64::from(hsb.b.min(100)) / 100.0;

    let chroma = value * saturation;
    let x = chroma * (1.0 - (hue % 2.0 - 1.0).abs());
    let m = value - chroma;

    let (r, g, b) = match hue {
        h if h < 1.0 => (chroma, x, 0.0),
        h if h < 2.0 => (x, chroma, 0.0),
        h if h < 3.0 => (0.0, chroma, x),
        h if h < 4.0 => (0.0, x, chroma),
        h if h < 5.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let max = f64::from(max_value);
    RgbColor {
        r: to_channel((r + m) * max),
        g: to_channel((g + m) * max),
        b: to_channel((b + m) * max),
    }
}

/// Convert RGB channels in `0..=max_value` into an HSB color.
///
/// Callers that hold an [`IotColor`] pass [`IotColor::rgb`]; intensity is
/// not folded into the returned brightness.
#[must_use]
pub fn rgb_to_hsb(rgb: RgbColor, max_value: u32) -> HsbColor {
    if max_value == 0 {
        return HsbColor::default();
    }

    let max = f64::from(max_value);
    let r = f64::from(rgb.r.min(max_value)) / max;
    let g = f64::from(rgb.g.min(max_value)) / max;
    let b = f64::from(rgb.b.min(max_value)) / max;

    let high = r.max(g).max(b);
    let low = r.min(g).min(b);
    let delta = high - low;

    let hue = if delta == 0.0 {
        0.0
    } else if (high - r).abs() < f64::EPSILON {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if (high - g).abs() < f64::EPSILON {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let saturation = if high == 0.0 { 0.0 } else { delta / high };

    HsbColor {
        h: to_hue(hue),
        s: to_percent(saturation * 100.0),
        b: to_percent(high * 100.0),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_hue(degrees: f64) -> u16 {
    (degrees.round().max(0.0) as u16) % 360
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}
