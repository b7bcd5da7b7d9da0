use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{NewTeam, Team, TeamChanges, TeamSummary};
use crate::store::{PgStore, StoreResult};

#[async_trait]
pub trait TeamRepo: Send + Sync {
    /// Inserts the team and its leader's approved membership atomically.
    async fn create_team_with_leader(&self, new: NewTeam) -> StoreResult<Team>;
    async fn find_team(&self, id: Uuid) -> StoreResult<Option<Team>>;
    async fn find_team_summary(&self, id: Uuid) -> StoreResult<Option<TeamSummary>>;
    async fn list_team_summaries(&self, hackathon_id: Uuid) -> StoreResult<Vec<TeamSummary>>;
    async fn update_team(&self, id: Uuid, changes: TeamChanges) -> StoreResult<Option<Team>>;
    /// Deletes the team and all of its join requests atomically. Returns
    /// `false` when there was no such team.
    async fn delete_team(&self, id: Uuid) -> StoreResult<bool>;
}

const TEAM_COLUMNS: &str = "id, name, hackathon_id, leader_id, description, needed_skills, created_at";

const SUMMARY_SELECT: &str = r#"
    SELECT t.id, t.name, t.hackathon_id, t.leader_id, t.description, t.needed_skills, t.created_at,
           l.name AS leader_name, l.email AS leader_email,
           COUNT(r.id) AS current_members,
           COALESCE(
               ARRAY_AGG(m.name ORDER BY r.created_at) FILTER (WHERE r.id IS NOT NULL),
               '{}'::TEXT[]
           ) AS member_names
      FROM teams t
      JOIN users l ON l.id = t.leader_id
      LEFT JOIN join_requests r ON r.team_id = t.id AND r.status = 'approved'
      LEFT JOIN users m ON m.id = r.user_id
"#;

#[async_trait]
impl TeamRepo for PgStore {
    async fn create_team_with_leader(&self, new: NewTeam) -> StoreResult<Team> {
        let mut tx = self.pool().begin().await.context("begin tx")?;

        let team = sqlx::query_as::<_, Team>(&format!(
            r#"
            INSERT INTO teams (name, hackathon_id, leader_id, description, needed_skills)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(new.hackathon_id)
        .bind(new.leader_id)
        .bind(&new.description)
        .bind(&new.needed_skills)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO join_requests (team_id, user_id, status) VALUES ($1, $2, 'approved')",
        )
        .bind(team.id)
        .bind(team.leader_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.context("commit tx")?;
        Ok(team)
    }

    async fn find_team(&self, id: Uuid) -> StoreResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(team)
    }

    async fn find_team_summary(&self, id: Uuid) -> StoreResult<Option<TeamSummary>> {
        let row = sqlx::query_as::<_, TeamSummary>(&format!(
            "{SUMMARY_SELECT} WHERE t.id = $1 GROUP BY t.id, l.id"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(row)
    }

    async fn list_team_summaries(&self, hackathon_id: Uuid) -> StoreResult<Vec<TeamSummary>> {
        let rows = sqlx::query_as::<_, TeamSummary>(&format!(
            "{SUMMARY_SELECT} WHERE t.hackathon_id = $1 GROUP BY t.id, l.id ORDER BY t.created_at ASC"
        ))
        .bind(hackathon_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn update_team(&self, id: Uuid, changes: TeamChanges) -> StoreResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(&format!(
            r#"
            UPDATE teams
               SET name          = COALESCE($2, name),
                   description   = COALESCE($3, description),
                   needed_skills = COALESCE($4, needed_skills)
             WHERE id = $1
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.needed_skills)
        .fetch_optional(self.pool())
        .await?;
        Ok(team)
    }

    async fn delete_team(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool().begin().await.context("begin tx")?;

        sqlx::query("DELETE FROM join_requests WHERE team_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await.context("commit tx")?;
        Ok(deleted > 0)
    }
}
