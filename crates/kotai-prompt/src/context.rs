//! Live context for contextual rendering: the clock and the starter draw.
//!
//! Gathering is kept apart from formatting so tests can pin the clock and
//! seed the random source.

use crate::error::CompositionError;
use crate::templates::{CONVERSATION_STARTERS, SMALLTALK_TIME_FORMAT};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// One read of a clock: the local wall time and the name of its zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    pub time: DateTime<FixedOffset>,
    /// Zone abbreviation as the zone database spells it, e.g. `CEST`.
    pub zone: String,
}

impl ClockReading {
    /// Takes the time and the zone abbreviation from the same instant.
    pub fn in_zone<Z>(time: DateTime<Z>) -> Self
    where
        Z: TimeZone,
        Z::Offset: fmt::Display,
    {
        Self {
            zone: time.format("%Z").to_string(),
            time: time.fixed_offset(),
        }
    }
}

/// Source of timezone-aware wall-clock time.
pub trait Clock {
    /// Reads the current time once.
    fn now(&self) -> Result<ClockReading, CompositionError>;
}

/// The process clock, in the host timezone or a named IANA zone.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    zone: Option<String>,
}

impl SystemClock {
    /// Uses the host's timezone: `TZ` if set, otherwise the system setting.
    pub fn local() -> Self {
        Self::default()
    }

    /// Reports time in the named zone, e.g. `Europe/Paris`.
    pub fn in_zone(name: impl Into<String>) -> Self {
        Self {
            zone: Some(name.into()),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Result<ClockReading, CompositionError> {
        let zone = match &self.zone {
            Some(name) => parse_zone(name)?,
            None => host_zone()?,
        };
        Ok(ClockReading::in_zone(Utc::now().with_timezone(&zone)))
    }
}

fn parse_zone(name: &str) -> Result<Tz, CompositionError> {
    name.parse::<Tz>()
        .map_err(|e| CompositionError::Clock(format!("unknown timezone `{name}`: {e}")))
}

fn host_zone() -> Result<Tz, CompositionError> {
    if let Ok(tz) = std::env::var("TZ") {
        let name = tz.trim_start_matches(':');
        if !name.is_empty() {
            return parse_zone(name);
        }
    }
    match iana_time_zone::get_timezone() {
        Ok(name) => parse_zone(&name),
        // No zone configured on the host means the C library runs on UTC.
        Err(err) => {
            tracing::debug!(error = %err, "host timezone not configured, reading UTC");
            Ok(Tz::UTC)
        }
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone)]
pub struct FixedClock(pub ClockReading);

impl FixedClock {
    pub fn at<Z>(time: DateTime<Z>) -> Self
    where
        Z: TimeZone,
        Z::Offset: fmt::Display,
    {
        Self(ClockReading::in_zone(time))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Result<ClockReading, CompositionError> {
        Ok(self.0.clone())
    }
}

/// Everything the smalltalk strategy samples at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmalltalkContext {
    /// Formatted local time, e.g. `Friday, March 07, 2025 at 09:41`.
    pub current_time: String,
    /// Zone abbreviation from the same clock read.
    pub timezone: String,
    /// One entry of [`CONVERSATION_STARTERS`].
    pub starter: &'static str,
}

impl SmalltalkContext {
    /// Reads the clock once and draws one conversation starter.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Clock`] if the clock cannot be read.
    pub fn gather<C, R>(clock: &C, rng: &mut R) -> Result<Self, CompositionError>
    where
        C: Clock + ?Sized,
        R: Rng + ?Sized,
    {
        let reading = clock.now()?;
        let starter = pick_starter(rng)?;
        Ok(Self::at(reading, starter))
    }

    /// Builds the context for a known reading and starter.
    pub fn at(reading: ClockReading, starter: &'static str) -> Self {
        Self {
            current_time: reading.time.format(SMALLTALK_TIME_FORMAT).to_string(),
            timezone: reading.zone,
            starter,
        }
    }
}

/// Draws one starter uniformly at random.
///
/// # Errors
///
/// Returns [`CompositionError::Template`] if the catalog is empty.
pub fn pick_starter<R: Rng + ?Sized>(rng: &mut R) -> Result<&'static str, CompositionError> {
    CONVERSATION_STARTERS
        .choose(rng)
        .copied()
        .ok_or_else(|| CompositionError::Template("conversation starter catalog is empty".into()))
}
