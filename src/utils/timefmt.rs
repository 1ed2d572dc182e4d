//! Wire formats for times: bare `HH:mm` fields and the
//! `"HH:mm-HH:mm"` permission window. Parsing and formatting happen
//! here and nowhere else; core logic works with `NaiveTime`.

use chrono::NaiveTime;

pub const HHMM: &str = "%H:%M";

pub fn format_hhmm(t: NaiveTime) -> String {
    t.format(HHMM).to_string()
}

pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    let t = s.trim();
    NaiveTime::parse_from_str(t, HHMM)
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()
}

pub fn format_window(from: NaiveTime, to: NaiveTime) -> String {
    format!("{}-{}", format_hhmm(from), format_hhmm(to))
}

pub fn parse_window(s: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (a, b) = s.split_once('-')?;
    Some((parse_hhmm(a)?, parse_hhmm(b)?))
}

/// serde codec for required `HH:mm` fields.
pub mod hhmm {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&format_hhmm(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(de)?;
        parse_hhmm(&raw).ok_or_else(|| serde::de::Error::custom(format!("bad time of day: {raw}")))
    }
}

/// serde codec for optional `HH:mm` fields. `None` serializes as an
/// explicit `null`; empty strings deserialize as `None`.
pub mod hhmm_opt {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<NaiveTime>, ser: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(t) => ser.serialize_str(&format_hhmm(*t)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(de)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_hhmm(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("bad time of day: {s}"))),
        }
    }
}
