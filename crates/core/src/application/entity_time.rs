// Entity Time Service - answering and interpreting time queries

use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::codec;
use crate::domain::{parse_utc, TimePayload, Zone};
use crate::error::Result;
use crate::port::TimeProvider;

/// What a received payload tells us about the peer's clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteTime {
    /// Payload instant converted to our local time (default-zone offset)
    pub local_instant: Option<NaiveDateTime>,
    /// Zone advertised by the peer, if it resolves
    pub peer_zone: Option<Zone>,
    /// Peer wall-clock time: the UTC value shifted by the peer zone's offset
    pub peer_local: Option<NaiveDateTime>,
    /// Peer-rendered display string, verbatim
    pub display: Option<String>,
}

/// Entity time use cases
pub struct EntityTimeService {
    time_provider: Arc<dyn TimeProvider>,
}

impl EntityTimeService {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { time_provider }
    }

    /// Body of a time request: an empty query
    pub fn request(&self) -> TimePayload {
        TimePayload::new()
    }

    /// Answer a time request with our current local time
    pub fn respond(&self) -> TimePayload {
        let payload = TimePayload::now(self.time_provider.as_ref());
        info!(
            utc = payload.utc().unwrap_or_default(),
            tz = payload.tz().unwrap_or_default(),
            "Answering entity time request"
        );
        payload
    }

    /// Payload for an explicit local instant in the zone named `zone_id`
    pub fn payload_at(&self, instant: NaiveDateTime, zone_id: &str) -> Result<TimePayload> {
        let zone = Zone::parse(zone_id)?;
        Ok(TimePayload::from_instant(instant, &zone))
    }

    /// Interpret a decoded response
    pub fn interpret(&self, payload: &TimePayload) -> RemoteTime {
        let local_instant = payload.to_instant(self.time_provider.as_ref());

        let peer_zone = payload.tz().and_then(|id| match Zone::parse(id) {
            Ok(zone) => Some(zone),
            Err(e) => {
                debug!(error = %e, "Peer zone not resolvable");
                None
            }
        });

        let peer_local = match (payload.utc(), peer_zone) {
            (Some(utc), Some(zone)) => parse_utc(utc)
                .ok()
                .map(|utc| utc + zone.offset_at_utc(&utc)),
            _ => None,
        };

        RemoteTime {
            local_instant,
            peer_zone,
            peer_local,
            display: payload.display().map(str::to_string),
        }
    }

    /// Decode a response fragment and interpret it
    pub fn interpret_xml(&self, xml: &str) -> Result<RemoteTime> {
        let payload = codec::decode(xml)?;
        Ok(self.interpret(&payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockTimeProvider;
    use chrono::NaiveDate;

    fn jan15(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn service(zone: Zone, now: NaiveDateTime) -> EntityTimeService {
        let mut mock = MockTimeProvider::new();
        mock.expect_default_zone().return_const(zone);
        mock.expect_now_local().return_const(now);
        EntityTimeService::new(Arc::new(mock))
    }

    #[test]
    fn test_request_is_empty_query() {
        let svc = service(Zone::Utc, jan15(0, 0));
        assert_eq!(
            svc.request().to_xml(),
            "<query xmlns=\"jabber:iq:time\"></query>"
        );
    }

    #[test]
    fn test_respond_uses_current_time() {
        let svc = service(Zone::parse("+01:00").unwrap(), jan15(9, 0));
        let payload = svc.respond();

        assert_eq!(payload.utc(), Some("20240115T08:00:00"));
        assert_eq!(payload.tz(), Some("+01:00"));
        assert_eq!(payload.display(), Some("Jan 15, 2024 9:00:00 AM"));
    }

    #[test]
    fn test_payload_at_named_zone() {
        let svc = service(Zone::Utc, jan15(0, 0));
        let payload = svc.payload_at(jan15(10, 30), "Europe/Berlin").unwrap();

        assert_eq!(payload.utc(), Some("20240115T09:30:00"));
        assert_eq!(payload.tz(), Some("Europe/Berlin"));
    }

    #[test]
    fn test_payload_at_unknown_zone() {
        let svc = service(Zone::Utc, jan15(0, 0));
        let err = svc.payload_at(jan15(10, 30), "Atlantis/Capital").unwrap_err();
        assert!(matches!(err, crate::AppError::Domain(_)));
    }

    #[test]
    fn test_interpret_peer_in_other_zone() {
        let svc = service(Zone::Utc, jan15(12, 0));
        let peer = TimePayload::from_instant(jan15(10, 30), &Zone::parse("+02:00").unwrap());

        let remote = svc.interpret(&peer);

        assert_eq!(remote.local_instant, Some(jan15(8, 30)));
        assert_eq!(remote.peer_zone, Some(Zone::parse("+02:00").unwrap()));
        assert_eq!(remote.peer_local, Some(jan15(10, 30)));
        assert_eq!(remote.display.as_deref(), Some("Jan 15, 2024 10:30:00 AM"));
    }

    #[test]
    fn test_interpret_unknown_peer_zone() {
        let svc = service(Zone::Utc, jan15(12, 0));
        let mut peer = TimePayload::new();
        peer.set_utc(Some("20240115T08:30:00".to_string()));
        peer.set_tz(Some("Somewhere/Else".to_string()));

        let remote = svc.interpret(&peer);

        assert_eq!(remote.local_instant, Some(jan15(8, 30)));
        assert_eq!(remote.peer_zone, None);
        assert_eq!(remote.peer_local, None);
    }

    #[test]
    fn test_interpret_xml_rejects_bad_fragment() {
        let svc = service(Zone::Utc, jan15(12, 0));
        assert!(svc.interpret_xml("<iq/>").is_err());
    }
}
