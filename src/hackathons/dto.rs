use serde::Deserialize;
use time::OffsetDateTime;

use super::repo_types::HackathonType;

#[derive(Debug, Deserialize)]
pub struct CreateHackathonRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "start_date::deserialize")]
    pub start_date: OffsetDateTime,
    #[serde(alias = "team_size")]
    pub max_team_size: i32,
    #[serde(rename = "type")]
    pub kind: HackathonType,
    #[serde(default)]
    pub url: Option<String>,
}

/// RFC 3339, or the offset-less `YYYY-MM-DDTHH:MM[:SS]` that browser
/// `datetime-local` inputs post, read as UTC.
mod start_date {
    use serde::{de::Error, Deserialize, Deserializer};
    use time::{
        format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
        PrimitiveDateTime,
    };

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        if let Ok(dt) = OffsetDateTime::parse(&raw, &Rfc3339) {
            return Ok(dt);
        }
        PrimitiveDateTime::parse(
            &raw,
            format_description!("[year]-[month]-[day]T[hour]:[minute][optional [:[second]]]"),
        )
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| {
            D::Error::custom(format!(
                "invalid start_date {raw:?}, expected RFC 3339 or YYYY-MM-DDTHH:MM"
            ))
        })
    }
}
