use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "hackathon_type")]
pub enum HackathonType {
    #[serde(alias = "open")]
    Open,
    #[serde(alias = "university")]
    University,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hackathon {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    pub max_team_size: i32,
    #[serde(rename = "type")]
    pub kind: HackathonType,
    pub url: Option<String>,
    pub created_by: Uuid,
    pub organizer_name: String, // creator's name at creation time
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Listing row: the hackathon plus approved members across all its teams.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HackathonSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub hackathon: Hackathon,
    pub current_members: i64,
}

#[derive(Debug, Clone)]
pub struct NewHackathon {
    pub title: String,
    pub description: String,
    pub start_date: OffsetDateTime,
    pub max_team_size: i32,
    pub kind: HackathonType,
    pub url: Option<String>,
    pub created_by: Uuid,
    pub organizer_name: String,
}
