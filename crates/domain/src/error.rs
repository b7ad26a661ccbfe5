//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HatchError`]
//! via `From` when crossing a port boundary.

/// Base error for every fallible operation exposed by the device adapter.
#[derive(Debug, thiserror::Error)]
pub enum HatchError {
    /// A command was called with input outside its accepted range.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// Power-on was requested but the device has no touch-ring routine.
    #[error("no eligible routine")]
    NoEligibleRoutine(#[from] NoEligibleRoutineError),

    /// The REST collaborator failed (network, status code, envelope).
    #[error("REST request failed")]
    Rest(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The shadow-sync transport failed to forward an update.
    #[error("shadow transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A state document or patch could not be (de)serialized.
    #[error("invalid state document")]
    Document(#[from] serde_json::Error),
}

/// Command input rejected before anything is sent to the device.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Hue must lie within `0..=360` degrees.
    #[error("hue {0} is out of range 0..=360")]
    HueOutOfRange(u16),

    /// Saturation must lie within `0..=100` percent.
    #[error("saturation {0} is out of range 0..=100")]
    SaturationOutOfRange(u8),

    /// Brightness must lie within `0..=100` percent.
    #[error("brightness {0} is out of range 0..=100")]
    BrightnessOutOfRange(u8),
}

/// The routine list fetched for a device contained no touch-ring routine.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("no default routine available for device {mac_address}")]
pub struct NoEligibleRoutineError {
    /// MAC address of the device the routines were fetched for.
    pub mac_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_no_eligible_routine_with_mac() {
        let err = NoEligibleRoutineError {
            mac_address: "AA:BB:CC:DD:EE:FF".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no default routine available for device AA:BB:CC:DD:EE:FF"
        );
    }

    #[test]
    fn should_convert_validation_error_into_hatch_error() {
        let err: HatchError = ValidationError::HueOutOfRange(400).into();
        assert!(matches!(
            err,
            HatchError::Validation(ValidationError::HueOutOfRange(400))
        ));
    }

    #[test]
    fn should_display_out_of_range_brightness() {
        let err = ValidationError::BrightnessOutOfRange(120);
        assert_eq!(err.to_string(), "brightness 120 is out of range 0..=100");
    }

    #[test]
    fn should_expose_source_for_rest_error() {
        use std::error::Error as _;

        let io = std::io::Error::other("connection reset");
        let err = HatchError::Rest(Box::new(io));
        assert_eq!(err.to_string(), "REST request failed");
        assert!(err.source().is_some());
    }
}
