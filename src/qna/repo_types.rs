use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuestionSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub question: Question,
    pub upvotes: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Answer {
    pub id: Uuid,
    pub question_id: Uuid,
    pub body: String,
    pub author_id: Uuid,
    pub author_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A question with its vote count and answers, oldest answer first.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionThread {
    #[serde(flatten)]
    pub summary: QuestionSummary,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub title: String,
    pub body: String,
    pub author_id: Uuid,
    pub author_name: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub question_id: Uuid,
    pub body: String,
    pub author_id: Uuid,
    pub author_name: String,
}
