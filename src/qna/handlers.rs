use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{AnswerRequest, AskQuestionRequest, VoteResponse},
    repo_types::{Answer, QuestionThread},
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
        .route("/questions", get(list_questions).post(ask_question))
        .route("/questions/:id/vote", post(upvote_question))
        .route("/answers", post(post_answer))
}

#[instrument(skip(state))]
pub async fn list_questions(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuestionThread>>, AppError> {
    Ok(Json(services::list(&state).await?))
}

#[instrument(skip(state, payload))]
pub async fn ask_question(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<AskQuestionRequest>,
) -> Result<(StatusCode, Json<QuestionThread>), AppError> {
    let thread = services::ask(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(thread)))
}

#[instrument(skip(state, payload), fields(question_id = %payload.question_id))]
pub async fn post_answer(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<AnswerRequest>,
) -> Result<(StatusCode, Json<Answer>), AppError> {
    let answer = services::answer(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

#[instrument(skip(state))]
pub async fn upvote_question(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(question_id): AppPath<Uuid>,
) -> Result<Json<VoteResponse>, AppError> {
    Ok(Json(services::upvote(&state, user_id, question_id).await?))
}
