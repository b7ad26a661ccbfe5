//! Virtual shadow error types.

use hatchlink_domain::error::HatchError;

/// Errors specific to the virtual shadow.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VirtualError {
    /// The simulated device was switched offline.
    #[error("virtual device {0} is offline")]
    Offline(String),

    /// Nobody is listening for reported state any more.
    #[error("reported state channel closed")]
    Closed,
}

impl From<VirtualError> for HatchError {
    fn from(err: VirtualError) -> Self {
        HatchError::Transport(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_offline_error() {
        let err = VirtualError::Offline("rest-1".to_string());
        assert_eq!(err.to_string(), "virtual device rest-1 is offline");
    }

    #[test]
    fn should_convert_into_transport_error() {
        let err: HatchError = VirtualError::Closed.into();
        assert!(matches!(err, HatchError::Transport(_)));
    }
}
