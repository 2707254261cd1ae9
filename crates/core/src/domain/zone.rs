// Time Zone Model
//
// A zone maps a local wall-clock instant to its UTC offset. Identifiers travel
// on the wire in the <tz> element.

use chrono::{FixedOffset, Local, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::error::{DomainError, Result};

/// Time zone resolvable to a UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Utc,
    /// Constant offset such as `+02:00`
    Fixed(FixedOffset),
    /// IANA zone with daylight-saving rules
    Named(Tz),
}

impl Zone {
    /// Resolve an identifier: `UTC`/`GMT`/`Z`, a fixed offset
    /// (`+02:00`, `-0530`, `UTC+2`) or an IANA name (`Europe/Berlin`).
    pub fn parse(id: &str) -> Result<Self> {
        let id = id.trim();
        match id {
            "" => return Err(DomainError::UnknownZone(id.to_string())),
            "UTC" | "GMT" | "Z" | "Etc/UTC" => return Ok(Zone::Utc),
            _ => {}
        }

        if let Some(offset) = parse_fixed_offset(id) {
            return Ok(Zone::Fixed(offset));
        }

        id.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| DomainError::UnknownZone(id.to_string()))
    }

    /// Operating system zone, resolved to an identifier a peer can parse.
    ///
    /// Uses the IANA name reported by the OS; if there is none, the current
    /// local offset as a fixed zone.
    pub fn system() -> Self {
        match iana_time_zone::get_timezone() {
            Ok(name) => match Zone::parse(&name) {
                Ok(zone) => return zone,
                Err(e) => debug!(error = %e, "System zone name not recognised"),
            },
            Err(e) => debug!(error = %e, "System zone name unavailable"),
        }
        Zone::Fixed(Local::now().offset().fix())
    }

    /// Fixed-offset zone from a number of seconds east of UTC
    pub fn from_offset_seconds(seconds: i32) -> Option<Self> {
        FixedOffset::east_opt(seconds).map(Zone::Fixed)
    }

    /// Identifier written to the <tz> element
    pub fn id(&self) -> String {
        match self {
            Zone::Utc => "UTC".to_string(),
            Zone::Fixed(offset) => offset.to_string(),
            Zone::Named(tz) => tz.name().to_string(),
        }
    }

    /// Offset in effect at a local wall-clock instant.
    ///
    /// Ambiguous local times (DST fold) take the earlier offset. Local times
    /// skipped by a DST gap take the offset in effect at that instant read as UTC.
    pub fn offset_at(&self, local: &NaiveDateTime) -> FixedOffset {
        match self {
            Zone::Utc => utc_offset(),
            Zone::Fixed(offset) => *offset,
            Zone::Named(tz) => tz
                .offset_from_local_datetime(local)
                .earliest()
                .map(|o| o.fix())
                .unwrap_or_else(|| tz.offset_from_utc_datetime(local).fix()),
        }
    }

    /// Offset in effect at a UTC instant
    pub fn offset_at_utc(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            Zone::Utc => utc_offset(),
            Zone::Fixed(offset) => *offset,
            Zone::Named(tz) => tz.offset_from_utc_datetime(utc).fix(),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl Serialize for Zone {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id())
    }
}

impl FromStr for Zone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        Zone::parse(s)
    }
}

fn utc_offset() -> FixedOffset {
    chrono::Utc.fix()
}

/// `+HH:MM`, `+HHMM`, `+HH`, optionally prefixed with `UTC` or `GMT`
fn parse_fixed_offset(id: &str) -> Option<FixedOffset> {
    let rest = id
        .strip_prefix("UTC")
        .or_else(|| id.strip_prefix("GMT"))
        .unwrap_or(id);

    let (sign, digits) = match rest.as_bytes().first()? {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };

    if hours.is_empty() || hours.len() > 2 || minutes.len() > 2 {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
