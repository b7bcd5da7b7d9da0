use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub hackathon_id: Uuid,
    pub leader_id: Uuid,
    pub description: String,
    pub needed_skills: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Listing row for a hackathon's team board.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TeamSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub team: Team,
    pub leader_name: String,
    pub leader_email: String,
    pub current_members: i64,
    pub member_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub hackathon_id: Uuid,
    pub leader_id: Uuid,
    pub description: String,
    pub needed_skills: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TeamChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub needed_skills: Option<Vec<String>>,
}
