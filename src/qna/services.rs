use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use super::{
    dto::{AnswerRequest, AskQuestionRequest, VoteResponse},
    repo::QnaRepo,
    repo_types::{Answer, NewAnswer, NewQuestion, QuestionSummary, QuestionThread},
};
use crate::{auth::repo::UserRepo, error::AppError, state::AppState};

const MAX_TITLE_LEN: usize = 200;

fn required(raw: &str, field: &str) -> Result<String, AppError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

async fn author_name(st: &AppState, actor: Uuid) -> Result<String, AppError> {
    let user = st
        .store
        .find_user(actor)
        .await?
        .ok_or(AppError::TokenInvalid)?;
    Ok(user.name)
}

pub async fn ask(
    st: &AppState,
    actor: Uuid,
    req: AskQuestionRequest,
) -> Result<QuestionThread, AppError> {
    let title = required(&req.title, "Title")?;
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    let body = required(&req.body, "Body")?;

    let question = st
        .store
        .insert_question(NewQuestion {
            title,
            body,
            author_id: actor,
            author_name: author_name(st, actor).await?,
            tags: req.tags.into_vec(),
        })
        .await?;
    info!(question_id = %question.id, author_id = %actor, "question posted");

    Ok(QuestionThread {
        summary: QuestionSummary {
            question,
            upvotes: 0,
        },
        answers: Vec::new(),
    })
}

/// Every question, newest first, with its answers nested.
pub async fn list(st: &AppState) -> Result<Vec<QuestionThread>, AppError> {
    let questions = st.store.list_questions().await?;
    let ids: Vec<Uuid> = questions.iter().map(|q| q.question.id).collect();

    let mut by_question: HashMap<Uuid, Vec<Answer>> = HashMap::new();
    for answer in st.store.list_answers(&ids).await? {
        by_question.entry(answer.question_id).or_default().push(answer);
    }

    Ok(questions
        .into_iter()
        .map(|summary| QuestionThread {
            answers: by_question.remove(&summary.question.id).unwrap_or_default(),
            summary,
        })
        .collect())
}

pub async fn answer(st: &AppState, actor: Uuid, req: AnswerRequest) -> Result<Answer, AppError> {
    let body = required(&req.body, "Body")?;
    st.store
        .find_question(req.question_id)
        .await?
        .ok_or(AppError::NotFound("question"))?;

    let answer = st
        .store
        .insert_answer(NewAnswer {
            question_id: req.question_id,
            body,
            author_id: actor,
            author_name: author_name(st, actor).await?,
        })
        .await?;
    info!(answer_id = %answer.id, question_id = %req.question_id, "answer posted");
    Ok(answer)
}

/// Counts at most one vote per user; repeating it is a no-op.
pub async fn upvote(st: &AppState, actor: Uuid, question_id: Uuid) -> Result<VoteResponse, AppError> {
    st.store
        .find_question(question_id)
        .await?
        .ok_or(AppError::NotFound("question"))?;
    author_name(st, actor).await?;

    let upvotes = st.store.add_vote(question_id, actor).await?;
    Ok(VoteResponse {
        question_id,
        upvotes,
    })
}
