use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::DecideRequest,
    repo_types::{JoinRequest, MyRequest, RequestWithApplicant},
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
        .route("/teams/:id/join", post(join_team))
        .route("/teams/:id/requests", get(list_requests))
        .route("/teams/:id/requests/:request_id", put(decide_request))
        .route("/me/requests", get(my_requests))
}

#[instrument(skip(state))]
pub async fn join_team(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(team_id): AppPath<Uuid>,
) -> Result<(StatusCode, Json<JoinRequest>), AppError> {
    let request = services::request_join(&state, user_id, team_id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

#[instrument(skip(state))]
pub async fn list_requests(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(team_id): AppPath<Uuid>,
) -> Result<Json<Vec<RequestWithApplicant>>, AppError> {
    Ok(Json(services::list_requests(&state, user_id, team_id).await?))
}

#[instrument(skip(state, payload), fields(status = %payload.status))]
pub async fn decide_request(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath((team_id, request_id)): AppPath<(Uuid, Uuid)>,
    AppJson(payload): AppJson<DecideRequest>,
) -> Result<Json<JoinRequest>, AppError> {
    let request = services::decide(&state, user_id, team_id, request_id, payload).await?;
    Ok(Json(request))
}

#[instrument(skip(state))]
pub async fn my_requests(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MyRequest>>, AppError> {
    Ok(Json(services::list_my_requests(&state, user_id).await?))
}
