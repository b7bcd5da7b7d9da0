use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateTeamRequest, UpdateTeamRequest},
    repo_types::{Team, TeamSummary},
    services,
};
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hackathons/:id/teams", get(list_teams).post(create_team))
        .route("/teams/:id", put(edit_team).delete(delete_team))
}

#[instrument(skip(state))]
pub async fn list_teams(
    State(state): State<AppState>,
    AppPath(hackathon_id): AppPath<Uuid>,
) -> Result<Json<Vec<TeamSummary>>, AppError> {
    Ok(Json(services::list_teams(&state, hackathon_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_team(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(hackathon_id): AppPath<Uuid>,
    AppJson(payload): AppJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamSummary>), AppError> {
    let team = services::create_team(&state, user_id, hackathon_id, payload).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

#[instrument(skip(state, payload))]
pub async fn edit_team(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(team_id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateTeamRequest>,
) -> Result<Json<Team>, AppError> {
    Ok(Json(services::edit_team(&state, user_id, team_id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_team(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(team_id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete_team(&state, user_id, team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
