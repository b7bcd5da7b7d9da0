use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{dto::CreateHackathonRequest, repo_types::HackathonSummary, services};
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hackathons", get(list_hackathons).post(create_hackathon))
        .route("/hackathons/:id", get(get_hackathon))
}

#[instrument(skip(state))]
pub async fn list_hackathons(
    State(state): State<AppState>,
) -> Result<Json<Vec<HackathonSummary>>, AppError> {
    Ok(Json(services::list(&state).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_hackathon(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateHackathonRequest>,
) -> Result<(StatusCode, Json<HackathonSummary>), AppError> {
    let created = services::create(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_hackathon(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<HackathonSummary>, AppError> {
    Ok(Json(services::get(&state, id).await?))
}
