//! Seek-target normalization for the timestamp forms the player accepts.

use std::str::FromStr;

use crate::error::PlayerError;

/// A seek position in one of the accepted notations.
///
/// ```
/// use mediasync::SeekTarget;
///
/// assert_eq!(SeekTarget::Seconds(15.4).as_seconds(), 15.4);
/// assert_eq!(SeekTarget::MinSec(1, 21.5).as_seconds(), 81.5);
/// assert_eq!(SeekTarget::HourMinSec(1, 1, 2.0).as_seconds(), 3662.0);
/// assert_eq!("01:01:33.5".parse::<SeekTarget>().unwrap().as_seconds(), 3693.5);
/// assert_eq!("01:01:33,045".parse::<SeekTarget>().unwrap().as_seconds(), 3693.045);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    Seconds(f64),
    MinSec(u64, f64),
    HourMinSec(u64, u64, f64),
}

impl SeekTarget {
    /// Normalize to a plain seconds value.
    pub fn as_seconds(self) -> f64 {
        match self {
            Self::Seconds(seconds) => seconds,
            Self::MinSec(minutes, seconds) => minutes as f64 * 60.0 + seconds,
            Self::HourMinSec(hours, minutes, seconds) => {
                hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds
            }
        }
    }
}

impl From<f64> for SeekTarget {
    fn from(seconds: f64) -> Self {
        Self::Seconds(seconds)
    }
}

impl From<(u64, f64)> for SeekTarget {
    fn from((minutes, seconds): (u64, f64)) -> Self {
        Self::MinSec(minutes, seconds)
    }
}

impl From<(u64, u64, f64)> for SeekTarget {
    fn from((hours, minutes, seconds): (u64, u64, f64)) -> Self {
        Self::HourMinSec(hours, minutes, seconds)
    }
}

impl FromStr for SeekTarget {
    type Err = PlayerError;

    /// Parse a colon-delimited timestamp; a comma decimal separator works too.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().replace(',', ".");
        let invalid = || PlayerError::InvalidTimecode(raw.to_string());

        let parts: Vec<&str> = normalized.split(':').collect();
        let seconds = |s: &str| s.parse::<f64>().map_err(|_| invalid());
        let whole = |s: &str| s.parse::<u64>().map_err(|_| invalid());

        match parts.as_slice() {
            [secs] => Ok(Self::Seconds(seconds(secs)?)),
            [mins, secs] => Ok(Self::MinSec(whole(mins)?, seconds(secs)?)),
            [hours, mins, secs] => Ok(Self::HourMinSec(
                whole(hours)?,
                whole(mins)?,
                seconds(secs)?,
            )),
            _ => Err(invalid()),
        }
    }
}
