use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::DrugSpeakError;

pub const SPEED_OPTIONS: &[(&str, f32)] =
    &[("0.25x", 0.25), ("0.33x", 0.33), ("0.75x", 0.75), ("1.0x", 1.0)];

/// A playback rate from the speed dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct PlaybackSpeed(f32);

impl PlaybackSpeed {
    pub const NORMAL: PlaybackSpeed = PlaybackSpeed(1.0);

    pub fn new(rate: f32) -> Result<Self, DrugSpeakError> {
        SPEED_OPTIONS
            .iter()
            .find(|(_, value)| (value - rate).abs() < 1e-3)
            .map(|(_, value)| PlaybackSpeed(*value))
            .ok_or(DrugSpeakError::InvalidSpeed(rate))
    }

    pub fn options() -> Vec<PlaybackSpeed> {
        SPEED_OPTIONS.iter().map(|(_, value)| PlaybackSpeed(*value)).collect()
    }

    pub fn rate(&self) -> f32 {
        self.0
    }

    pub fn label(&self) -> &'static str {
        SPEED_OPTIONS
            .iter()
            .find(|(_, value)| *value == self.0)
            .map(|(label, _)| *label)
            .unwrap_or("1.0x")
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<f32> for PlaybackSpeed {
    type Error = DrugSpeakError;

    fn try_from(rate: f32) -> Result<Self, Self::Error> {
        PlaybackSpeed::new(rate)
    }
}

impl From<PlaybackSpeed> for f32 {
    fn from(speed: PlaybackSpeed) -> Self {
        speed.0
    }
}
