//! Routines — user-defined sequences the device can play.

use serde::{Deserialize, Serialize};

/// A routine as returned by the routine fetch endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: u64,
    pub display_order: i64,
    #[serde(rename = "type")]
    pub kind: RoutineType,
    #[serde(default)]
    pub button0: bool,
}

/// Routine category. Only `favorite` matters for touch-ring selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoutineType {
    Favorite,
    #[serde(other)]
    Other,
}

impl Routine {
    /// Whether the routine can be started from the device's touch ring.
    ///
    /// Older firmware only put favorites on the ring; newer firmware allows
    /// any routine type and flags those with `button0`.
    #[must_use]
    pub fn is_touch_ring(&self) -> bool {
        self.kind == RoutineType::Favorite || self.button0
    }
}

/// Sort routines by ascending `display_order` and keep touch-ring routines.
///
/// The sort is stable, so routines sharing a display order keep the order
/// the server returned them in.
#[must_use]
pub fn touch_ring_routines(mut routines: Vec<Routine>) -> Vec<Routine> {
    routines.sort_by_key(|routine| routine.display_order);
    routines.retain(Routine::is_touch_ring);
    routines
}
