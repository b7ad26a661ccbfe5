//! Linear scaling between device channel values and UI percentages.
//!
//! Both directions round half up using exact integer arithmetic, and inputs
//! outside the valid range are clamped rather than rejected.

/// Largest value a device-reported channel (volume, color, intensity) can take.
pub const MAX_IOT_VALUE: u32 = 65_535;

/// Convert a device channel value (`0..=MAX_IOT_VALUE`) into a percentage.
#[must_use]
pub fn to_percentage(value: u32) -> u8 {
    let value = u64::from(value.min(MAX_IOT_VALUE));
    let max = u64::from(MAX_IOT_VALUE);
    let pct = (200 * value + max) / (2 * max);
    // bounded by 100 after the clamp above
    u8::try_from(pct).unwrap_or(100)
}

/// Convert a percentage (`0..=100`) into a device channel value.
#[must_use]
pub fn from_percentage(percentage: u8) -> u32 {
    let pct = u64::from(percentage.min(100));
    let value = (2 * pct * u64::from(MAX_IOT_VALUE) + 100) / 200;
    u32::try_from(value).unwrap_or(MAX_IOT_VALUE)
}
