//! Duration selection backing the front end's time picker

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hours/minutes/seconds the user dialed in before pressing start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSelection {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl DurationSelection {
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// Apply one of the preset buttons. Minute presets overwrite the minutes
    /// field and keep the hours, hour presets do the opposite, matching the
    /// desktop time-picker behavior.
    pub fn apply_preset(&mut self, preset: Preset) {
        match preset {
            Preset::Minutes15 => self.minutes = 15,
            Preset::Minutes30 => self.minutes = 30,
            Preset::Minutes45 => self.minutes = 45,
            Preset::Hours1 => self.hours = 1,
            Preset::Hours2 => self.hours = 2,
            Preset::Hours3 => self.hours = 3,
        }
    }

    /// Clear the selection back to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The fixed preset buttons offered by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Minutes15,
    Minutes30,
    Minutes45,
    Hours1,
    Hours2,
    Hours3,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preset: {0}")]
pub struct UnknownPreset(pub String);

impl std::str::FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "15m" => Ok(Self::Minutes15),
            "30m" => Ok(Self::Minutes30),
            "45m" => Ok(Self::Minutes45),
            "1h" => Ok(Self::Hours1),
            "2h" => Ok(Self::Hours2),
            "3h" => Ok(Self::Hours3),
            other => Err(UnknownPreset(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_seconds_combines_all_fields() {
        let selection = DurationSelection {
            hours: 1,
            minutes: 30,
            seconds: 15,
        };
        assert_eq!(selection.total_seconds(), 5415);
    }

    #[test]
    fn minute_presets_keep_hours() {
        let mut selection = DurationSelection::default();
        selection.apply_preset(Preset::Hours2);
        selection.apply_preset(Preset::Minutes45);
        assert_eq!(selection.hours, 2);
        assert_eq!(selection.minutes, 45);
    }

    #[test]
    fn hour_presets_keep_minutes() {
        let mut selection = DurationSelection::default();
        selection.apply_preset(Preset::Minutes15);
        selection.apply_preset(Preset::Hours3);
        assert_eq!(selection.hours, 3);
        assert_eq!(selection.minutes, 15);
    }

    #[test]
    fn reset_zeroes_the_selection() {
        let mut selection = DurationSelection {
            hours: 1,
            minutes: 2,
            seconds: 3,
        };
        selection.reset();
        assert_eq!(selection.total_seconds(), 0);
    }

    #[test]
    fn presets_parse_from_path_segments() {
        assert_eq!("15m".parse::<Preset>().unwrap(), Preset::Minutes15);
        assert_eq!("3h".parse::<Preset>().unwrap(), Preset::Hours3);
        assert!("90m".parse::<Preset>().is_err());
    }
}
