use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::{
    repo_types::{JoinRequest, MyRequest, RequestWithApplicant, StatusUpdate, UpdateOutcome},
    status::RequestStatus,
};
use crate::store::{PgStore, StoreResult};

#[async_trait]
pub trait RequestRepo: Send + Sync {
    /// Inserts a `pending` request. A second request for the same
    /// (team, user) fails on `join_requests_team_user_key`.
    async fn insert_request(&self, team_id: Uuid, user_id: Uuid) -> StoreResult<JoinRequest>;
    async fn find_request(&self, id: Uuid) -> StoreResult<Option<JoinRequest>>;
    async fn update_request_status(&self, update: StatusUpdate) -> StoreResult<UpdateOutcome>;
    async fn list_team_requests(&self, team_id: Uuid) -> StoreResult<Vec<RequestWithApplicant>>;
    async fn list_user_requests(&self, user_id: Uuid) -> StoreResult<Vec<MyRequest>>;
}

const REQUEST_COLUMNS: &str = "id, team_id, user_id, status, rejection_reason, created_at";

#[async_trait]
impl RequestRepo for PgStore {
    async fn insert_request(&self, team_id: Uuid, user_id: Uuid) -> StoreResult<JoinRequest> {
        let row = sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            INSERT INTO join_requests (team_id, user_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(team_id)
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    async fn find_request(&self, id: Uuid) -> StoreResult<Option<JoinRequest>> {
        let row = sqlx::query_as::<_, JoinRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM join_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn update_request_status(&self, update: StatusUpdate) -> StoreResult<UpdateOutcome> {
        let mut tx = self.pool().begin().await.context("begin tx")?;

        // Serializes decisions on one team so capacity cannot be overshot.
        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM teams WHERE id = $1 FOR UPDATE")
                .bind(update.team_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(UpdateOutcome::Stale);
        }

        if let (RequestStatus::Approved, Some(capacity)) = (update.status, update.capacity) {
            let (approved,): (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM join_requests WHERE team_id = $1 AND status = 'approved'",
            )
            .bind(update.team_id)
            .fetch_one(&mut *tx)
            .await?;
            if approved >= capacity {
                return Ok(UpdateOutcome::TeamFull);
            }
        }

        let row = sqlx::query_as::<_, JoinRequest>(&format!(
            r#"
            UPDATE join_requests
               SET status = $1, rejection_reason = $2
             WHERE id = $3 AND team_id = $4 AND status = $5
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(update.status)
        .bind(&update.rejection_reason)
        .bind(update.request_id)
        .bind(update.team_id)
        .bind(update.expected)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(UpdateOutcome::Stale);
        };
        tx.commit().await.context("commit tx")?;
        Ok(UpdateOutcome::Applied(row))
    }

    async fn list_team_requests(&self, team_id: Uuid) -> StoreResult<Vec<RequestWithApplicant>> {
        let rows = sqlx::query_as::<_, RequestWithApplicant>(
            r#"
            SELECT r.id, r.team_id, r.user_id, r.status, r.rejection_reason, r.created_at,
                   u.name AS user_name, u.email AS user_email,
                   u.university AS user_university, u.skills AS user_skills
              FROM join_requests r
              JOIN users u ON u.id = r.user_id
             WHERE r.team_id = $1
             ORDER BY r.created_at ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn list_user_requests(&self, user_id: Uuid) -> StoreResult<Vec<MyRequest>> {
        let rows = sqlx::query_as::<_, MyRequest>(
            r#"
            SELECT r.id, r.team_id, r.user_id, r.status, r.rejection_reason, r.created_at,
                   t.name AS team_name, h.id AS hackathon_id, h.title AS hackathon_title
              FROM join_requests r
              JOIN teams t ON t.id = r.team_id
              JOIN hackathons h ON h.id = t.hackathon_id
             WHERE r.user_id = $1
             ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}
