use chrono::NaiveTime;
use serde::{Deserialize, Deserializer};

use crate::network::{Network, StationId, Weight};

// Accepts "HH:MM" or "HH:MM:SS".
pub fn parse_time(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
}

pub fn round2(x: f64) -> f64 {
    (x * 100.).round() / 100.
}

pub fn format_weight(weight: Weight) -> String {
    format!("{weight:.2}")
}

/// Station name, or a label built from the id for stations without details.
pub fn station_label(network: &Network, id: StationId) -> String {
    match network.station(id).and_then(|station| station.name()) {
        Some(name) => name.to_string(),
        None => format!("station {id}"),
    }
}

// Boolean columns are written either as 0/1 or as true/false.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid flag '{other}'"))),
    }
}
