use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::skills::SkillList;

#[derive(Debug, Deserialize)]
pub struct AskQuestionRequest {
    pub title: String,
    pub body: String,
    /// Normalized like skills: array or comma-separated string.
    #[serde(default)]
    pub tags: SkillList,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question_id: Uuid,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub question_id: Uuid,
    pub upvotes: i64,
}
