use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::status::RequestStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JoinRequest {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub status: RequestStatus,
    pub rejection_reason: Option<String>, // only set while status = rejected
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A team's request joined with the applicant's profile, for the leader.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RequestWithApplicant {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: JoinRequest,
    pub user_name: String,
    pub user_email: String,
    pub user_university: Option<String>,
    pub user_skills: Vec<String>,
}

/// One of the caller's own requests with enough context to render it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MyRequest {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: JoinRequest,
    pub team_name: String,
    pub hackathon_id: Uuid,
    pub hackathon_title: String,
}

/// Conditional status change: applied only while the request is still in
/// `expected`.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub team_id: Uuid,
    pub request_id: Uuid,
    pub expected: RequestStatus,
    pub status: RequestStatus,
    pub rejection_reason: Option<String>,
    /// Upper bound on approved members, checked with the team row locked.
    pub capacity: Option<i64>,
}

#[derive(Debug)]
pub enum UpdateOutcome {
    Applied(JoinRequest),
    /// The request changed status or disappeared since it was read.
    Stale,
    TeamFull,
}
