use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateTeamRequest, UpdateTeamRequest},
    repo::TeamRepo,
    repo_types::{NewTeam, Team, TeamChanges, TeamSummary},
};
use crate::{
    auth::repo::UserRepo, error::AppError, guard, hackathons::repo::HackathonRepo,
    state::AppState,
};

fn team_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("Team name is required"));
    }
    Ok(name.to_string())
}

pub(crate) async fn load_team(st: &AppState, team_id: Uuid) -> Result<Team, AppError> {
    st.store
        .find_team(team_id)
        .await?
        .ok_or(AppError::NotFound("team"))
}

pub async fn create_team(
    st: &AppState,
    actor: Uuid,
    hackathon_id: Uuid,
    req: CreateTeamRequest,
) -> Result<TeamSummary, AppError> {
    let name = team_name(&req.name)?;

    st.store
        .find_hackathon(hackathon_id)
        .await?
        .ok_or(AppError::NotFound("hackathon"))?;
    st.store
        .find_user(actor)
        .await?
        .ok_or(AppError::TokenInvalid)?;

    let team = st
        .store
        .create_team_with_leader(NewTeam {
            name,
            hackathon_id,
            leader_id: actor,
            description: req.description.trim().to_string(),
            needed_skills: req.needed_skills.into_vec(),
        })
        .await?;
    info!(team_id = %team.id, %hackathon_id, leader_id = %actor, "team created");

    st.store
        .find_team_summary(team.id)
        .await?
        .ok_or(AppError::NotFound("team"))
}

pub async fn list_teams(st: &AppState, hackathon_id: Uuid) -> Result<Vec<TeamSummary>, AppError> {
    st.store
        .find_hackathon(hackathon_id)
        .await?
        .ok_or(AppError::NotFound("hackathon"))?;
    Ok(st.store.list_team_summaries(hackathon_id).await?)
}

pub async fn edit_team(
    st: &AppState,
    actor: Uuid,
    team_id: Uuid,
    req: UpdateTeamRequest,
) -> Result<Team, AppError> {
    let team = load_team(st, team_id).await?;
    guard::ensure_team_leader(actor, &team)?;

    let changes = TeamChanges {
        name: req.name.as_deref().map(team_name).transpose()?,
        description: req.description.map(|d| d.trim().to_string()),
        needed_skills: req.needed_skills.map(|s| s.into_vec()),
    };
    let updated = st
        .store
        .update_team(team_id, changes)
        .await?
        .ok_or(AppError::NotFound("team"))?;

    info!(%team_id, "team updated");
    Ok(updated)
}

pub async fn delete_team(st: &AppState, actor: Uuid, team_id: Uuid) -> Result<(), AppError> {
    let team = load_team(st, team_id).await?;
    guard::ensure_team_leader(actor, &team)?;

    if !st.store.delete_team(team_id).await? {
        return Err(AppError::NotFound("team"));
    }
    info!(%team_id, "team deleted");
    Ok(())
}
