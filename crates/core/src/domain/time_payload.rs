// Entity Time Payload (jabber:iq:time query body)

use chrono::{FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::utc_format::{format_display, format_utc, parse_utc};
use super::zone::Zone;
use crate::port::TimeProvider;

/// XML namespace of the entity time query
pub const NAMESPACE: &str = "jabber:iq:time";

/// Body of an entity time request or response.
///
/// All three fields are optional and independent: nothing keeps `display`
/// in step with `utc` once either is changed through a setter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePayload {
    /// Timestamp in the fixed `CCYYMMDD'T'hh:mm:ss` pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    utc: Option<String>,

    /// Zone identifier of the sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tz: Option<String>,

    /// Human-readable local time, rendered once at construction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display: Option<String>,
}

impl TimePayload {
    /// Empty payload, as sent with a time request
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate every field from a local wall-clock instant in `zone`.
    ///
    /// `utc` is the instant minus the zone's offset at that instant.
    pub fn from_instant(instant: NaiveDateTime, zone: &Zone) -> Self {
        let offset = zone.offset_at(&instant);

        Self {
            utc: Some(format_utc(&shift_to_utc(instant, offset))),
            tz: Some(zone.id()),
            display: Some(format_display(&instant)),
        }
    }

    /// Payload for the provider's current local time in its default zone
    pub fn now(provider: &dyn TimeProvider) -> Self {
        Self::from_instant(provider.now_local(), &provider.default_zone())
    }

    /// Local instant carried by `utc`, or `None` if it is unset or unparseable.
    ///
    /// The offset added back is the provider's *default* zone at the
    /// provider's current time, not the zone named in `tz` that was used to
    /// build the payload. The two only agree when sender and receiver share a
    /// zone; callers relying on either behaviour see it unchanged here.
    pub fn to_instant(&self, provider: &dyn TimeProvider) -> Option<NaiveDateTime> {
        let utc = self.utc.as_deref()?;

        match parse_utc(utc) {
            Ok(parsed) => {
                let offset = provider
                    .default_zone()
                    .offset_at(&provider.now_local());
                Some(parsed + offset)
            }
            Err(e) => {
                warn!(error = %e, utc = %utc, "Discarding unparseable entity time");
                None
            }
        }
    }

    /// Overwrite `utc` from a local instant in the provider's default zone.
    /// `display` and `tz` are left as they are.
    pub fn set_instant(&mut self, instant: NaiveDateTime, provider: &dyn TimeProvider) {
        let offset = provider.default_zone().offset_at(&instant);
        self.utc = Some(format_utc(&shift_to_utc(instant, offset)));
    }

    pub fn utc(&self) -> Option<&str> {
        self.utc.as_deref()
    }

    pub fn set_utc(&mut self, utc: Option<String>) {
        self.utc = utc;
    }

    pub fn tz(&self) -> Option<&str> {
        self.tz.as_deref()
    }

    pub fn set_tz(&mut self, tz: Option<String>) {
        self.tz = tz;
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn set_display(&mut self, display: Option<String>) {
        self.display = display;
    }

    /// Serialize to the `<query xmlns="jabber:iq:time">` child element.
    ///
    /// Values are written verbatim, without XML escaping.
    pub fn to_xml(&self) -> String {
        let mut buf = String::with_capacity(96);
        buf.push_str("<query xmlns=\"");
        buf.push_str(NAMESPACE);
        buf.push_str("\">");

        let children = [
            ("utc", &self.utc),
            ("tz", &self.tz),
            ("display", &self.display),
        ];
        for (name, value) in children {
            if let Some(value) = value {
                buf.push('<');
                buf.push_str(name);
                buf.push('>');
                buf.push_str(value);
                buf.push_str("</");
                buf.push_str(name);
                buf.push('>');
            }
        }

        buf.push_str("</query>");
        buf
    }
}

/// `local - offset`, clamped to the representable range
fn shift_to_utc(local: NaiveDateTime, offset: FixedOffset) -> NaiveDateTime {
    local.checked_sub_offset(offset).unwrap_or(if offset.local_minus_utc() > 0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}
