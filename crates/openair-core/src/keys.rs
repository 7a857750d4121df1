//! Object-key codec for prerecordings.
//!
//! A prerecording is stored under `{event}/{start}`, where `{event}` is the
//! event UUID and `{start}` is the instance start time rendered as ISO-8601
//! seconds with a microsecond fraction appended only when it is non-zero.
//! Keys are split on the first `/`; both halves must parse.

use chrono::NaiveDateTime;
use uuid::Uuid;

/// Failure to decode an object key.
///
/// A malformed key under an event prefix means the bucket holds objects this
/// service did not write. That is an internal fault, never a client error.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Malformed object key: {0}")]
    Malformed(String),
}

/// Prefix under which all prerecordings of an event live.
pub fn event_prefix(event: Uuid) -> String {
    format!("{event}/")
}

/// Encode the object key for a prerecording.
pub fn encode_key(event: Uuid, start: NaiveDateTime) -> String {
    format!("{}{}", event_prefix(event), encode_start(start))
}

/// Decode an object key back into its event and start time.
pub fn decode_key(key: &str) -> Result<(Uuid, NaiveDateTime), KeyError> {
    let (prefix, name) = key
        .split_once('/')
        .ok_or_else(|| KeyError::Malformed(key.to_string()))?;

    let event = Uuid::parse_str(prefix).map_err(|_| KeyError::Malformed(key.to_string()))?;
    let start: NaiveDateTime = name
        .parse()
        .map_err(|_| KeyError::Malformed(key.to_string()))?;

    Ok((event, start))
}

// `%.f` trims trailing zeros, so the fraction is written by hand to keep a
// fixed six-digit microsecond field.
fn encode_start(start: NaiveDateTime) -> String {
    let micros = start.and_utc().timestamp_subsec_micros();
    if micros == 0 {
        start.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        format!("{}.{micros:06}", start.format("%Y-%m-%dT%H:%M:%S"))
    }
}
