use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Hackathon, HackathonSummary, NewHackathon};
use crate::store::{PgStore, StoreResult};

#[async_trait]
pub trait HackathonRepo: Send + Sync {
    async fn insert_hackathon(&self, new: NewHackathon) -> StoreResult<Hackathon>;
    /// All hackathons, earliest start first.
    async fn list_hackathons(&self) -> StoreResult<Vec<HackathonSummary>>;
    async fn find_hackathon(&self, id: Uuid) -> StoreResult<Option<HackathonSummary>>;
}

const SUMMARY_SELECT: &str = r#"
    SELECT h.id, h.title, h.description, h.start_date, h.max_team_size, h.kind, h.url,
           h.created_by, h.organizer_name, h.created_at,
           (SELECT COUNT(*)
              FROM join_requests r
              JOIN teams t ON t.id = r.team_id
             WHERE t.hackathon_id = h.id AND r.status = 'approved') AS current_members
      FROM hackathons h
"#;

#[async_trait]
impl HackathonRepo for PgStore {
    async fn insert_hackathon(&self, new: NewHackathon) -> StoreResult<Hackathon> {
        let row = sqlx::query_as::<_, Hackathon>(
            r#"
            INSERT INTO hackathons
                (title, description, start_date, max_team_size, kind, url, created_by, organizer_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, start_date, max_team_size, kind, url,
                      created_by, organizer_name, created_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.start_date)
        .bind(new.max_team_size)
        .bind(new.kind)
        .bind(&new.url)
        .bind(new.created_by)
        .bind(&new.organizer_name)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    async fn list_hackathons(&self) -> StoreResult<Vec<HackathonSummary>> {
        let rows = sqlx::query_as::<_, HackathonSummary>(&format!(
            "{SUMMARY_SELECT} ORDER BY h.start_date ASC, h.created_at ASC"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn find_hackathon(&self, id: Uuid) -> StoreResult<Option<HackathonSummary>> {
        let row = sqlx::query_as::<_, HackathonSummary>(&format!("{SUMMARY_SELECT} WHERE h.id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }
}
