//! Audio tracks known to the Rest family.

use serde::{Deserialize, Serialize};

/// Identifier of the track in `current.sound.id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioTrack(pub u32);

impl AudioTrack {
    /// Silence.
    pub const NONE: Self = Self(0);
    pub const STREAM: Self = Self(2);
    pub const PINK_NOISE: Self = Self(3);
    pub const DRYER: Self = Self(4);
    pub const OCEAN: Self = Self(5);
    pub const WIND: Self = Self(6);
    pub const RAIN: Self = Self(7);
    pub const BIRD: Self = Self(9);
    pub const CRICKETS: Self = Self(10);
    pub const BRAHMS: Self = Self(11);
    pub const TWINKLE: Self = Self(13);
    pub const ROCK_A_BYE: Self = Self(14);

    /// Whether this track produces sound.
    #[must_use]
    pub fn is_playing(self) -> bool {
        self != Self::NONE
    }

    /// Display name, if the track is in [`AUDIO_TRACKS`].
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        AUDIO_TRACKS
            .iter()
            .find(|(track, _)| *track == self)
            .map(|(_, name)| *name)
    }
}

/// Catalogue of selectable tracks, in the order the vendor app lists them.
pub const AUDIO_TRACKS: &[(AudioTrack, &str)] = &[
    (AudioTrack::NONE, "None"),
    (AudioTrack::STREAM, "Stream"),
    (AudioTrack::PINK_NOISE, "Pink Noise"),
    (AudioTrack::DRYER, "Dryer"),
    (AudioTrack::OCEAN, "Ocean"),
    (AudioTrack::WIND, "Wind"),
    (AudioTrack::RAIN, "Rain"),
    (AudioTrack::BIRD, "Bird"),
    (AudioTrack::CRICKETS, "Crickets"),
    (AudioTrack::BRAHMS, "Brahms' Lullaby"),
    (AudioTrack::TWINKLE, "Twinkle Twinkle Little Star"),
    (AudioTrack::ROCK_A_BYE, "Rock-a-bye Baby"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_report_none_as_silent() {
        assert!(!AudioTrack::NONE.is_playing());
        assert!(AudioTrack::OCEAN.is_playing());
    }

    #[test]
    fn should_look_up_track_name() {
        assert_eq!(AudioTrack::RAIN.name(), Some("Rain"));
        assert_eq!(AudioTrack(99).name(), None);
    }

    #[test]
    fn should_serialize_as_bare_integer() {
        assert_eq!(serde_json::to_string(&AudioTrack::WIND).unwrap(), "6");
        let track: AudioTrack = serde_json::from_str("10").unwrap();
        assert_eq!(track, AudioTrack::CRICKETS);
    }
}
