// Element-by-element decoder for <query xmlns="jabber:iq:time">

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::debug;

use super::error::{CodecError, Result};
use crate::domain::{TimePayload, NAMESPACE};

/// Child elements understood inside the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Utc,
    Tz,
    Display,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"utc" => Some(Field::Utc),
            b"tz" => Some(Field::Tz),
            b"display" => Some(Field::Display),
            _ => None,
        }
    }

    fn apply(self, payload: &mut TimePayload, value: String) {
        match self {
            Field::Utc => payload.set_utc(Some(value)),
            Field::Tz => payload.set_tz(Some(value)),
            Field::Display => payload.set_display(Some(value)),
        }
    }
}

/// Decode a query fragment into a payload.
///
/// Children other than `utc`, `tz` and `display` are skipped. A child that is
/// present but empty sets its field to the empty string. Field text is kept
/// exactly as sent, surrounding whitespace included.
pub fn decode(xml: &str) -> Result<TimePayload> {
    let mut reader = NsReader::from_str(xml);

    let mut payload = TimePayload::new();
    let mut seen_query = false;
    let mut depth = 0usize;
    let mut current: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(e)) => {
                if depth == 0 {
                    check_root(&ns, &e)?;
                    seen_query = true;
                } else if depth == 1 {
                    current = Field::from_local_name(e.local_name().as_ref());
                    text.clear();
                    if current.is_none() {
                        debug!(
                            element = %String::from_utf8_lossy(e.name().as_ref()),
                            "Skipping unknown time query child"
                        );
                    }
                }
                depth += 1;
            }
            (ns, Event::Empty(e)) => {
                if depth == 0 {
                    check_root(&ns, &e)?;
                    return Ok(payload);
                }
                if depth == 1 {
                    if let Some(field) = Field::from_local_name(e.local_name().as_ref()) {
                        field.apply(&mut payload, String::new());
                    }
                }
            }
            (_, Event::Text(t)) => {
                if depth == 2 && current.is_some() {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| CodecError::Malformed(e.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            (_, Event::CData(c)) => {
                if depth == 2 && current.is_some() {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            (_, Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    if let Some(field) = current.take() {
                        field.apply(&mut payload, std::mem::take(&mut text));
                    }
                } else if depth == 0 {
                    break;
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    if !seen_query {
        return Err(CodecError::MissingQuery);
    }
    if depth != 0 {
        return Err(CodecError::Malformed("unclosed <query> element".to_string()));
    }

    Ok(payload)
}

fn check_root(ns: &ResolveResult<'_>, element: &BytesStart<'_>) -> Result<()> {
    let is_query = element.local_name().as_ref() == b"query";
    let in_namespace =
        matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == NAMESPACE.as_bytes());

    if is_query && in_namespace {
        Ok(())
    } else {
        Err(CodecError::UnexpectedRoot {
            expected: NAMESPACE,
            found: String::from_utf8_lossy(element.name().as_ref()).into_owned(),
        })
    }
}
