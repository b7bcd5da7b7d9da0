use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Answer, NewAnswer, NewQuestion, Question, QuestionSummary};
use crate::store::{PgStore, StoreResult};

#[async_trait]
pub trait QnaRepo: Send + Sync {
    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question>;
    /// Newest question first.
    async fn list_questions(&self) -> StoreResult<Vec<QuestionSummary>>;
    async fn find_question(&self, id: Uuid) -> StoreResult<Option<QuestionSummary>>;
    async fn insert_answer(&self, new: NewAnswer) -> StoreResult<Answer>;
    /// Answers to any of `question_ids`, oldest first.
    async fn list_answers(&self, question_ids: &[Uuid]) -> StoreResult<Vec<Answer>>;
    /// Records one vote per (question, user) and returns the question's total.
    async fn add_vote(&self, question_id: Uuid, user_id: Uuid) -> StoreResult<i64>;
}

const SUMMARY_SELECT: &str = r#"
    SELECT q.id, q.title, q.body, q.author_id, q.author_name, q.tags, q.created_at,
           (SELECT COUNT(*) FROM question_votes v WHERE v.question_id = q.id) AS upvotes
      FROM questions q
"#;

const ANSWER_COLUMNS: &str = "id, question_id, body, author_id, author_name, created_at";

#[async_trait]
impl QnaRepo for PgStore {
    async fn insert_question(&self, new: NewQuestion) -> StoreResult<Question> {
        let row = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (title, body, author_id, author_name, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, body, author_id, author_name, tags, created_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.body)
        .bind(new.author_id)
        .bind(&new.author_name)
        .bind(&new.tags)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    async fn list_questions(&self) -> StoreResult<Vec<QuestionSummary>> {
        let rows = sqlx::query_as::<_, QuestionSummary>(&format!(
            "{SUMMARY_SELECT} ORDER BY q.created_at DESC"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn find_question(&self, id: Uuid) -> StoreResult<Option<QuestionSummary>> {
        let row = sqlx::query_as::<_, QuestionSummary>(&format!("{SUMMARY_SELECT} WHERE q.id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    async fn insert_answer(&self, new: NewAnswer) -> StoreResult<Answer> {
        let row = sqlx::query_as::<_, Answer>(&format!(
            r#"
            INSERT INTO answers (question_id, body, author_id, author_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {ANSWER_COLUMNS}
            "#
        ))
        .bind(new.question_id)
        .bind(&new.body)
        .bind(new.author_id)
        .bind(&new.author_name)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    async fn list_answers(&self, question_ids: &[Uuid]) -> StoreResult<Vec<Answer>> {
        let rows = sqlx::query_as::<_, Answer>(&format!(
            "SELECT {ANSWER_COLUMNS} FROM answers WHERE question_id = ANY($1) ORDER BY created_at ASC"
        ))
        .bind(question_ids)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn add_vote(&self, question_id: Uuid, user_id: Uuid) -> StoreResult<i64> {
        sqlx::query(
            r#"
            INSERT INTO question_votes (question_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (question_id, user_id) DO NOTHING
            "#,
        )
        .bind(question_id)
        .bind(user_id)
        .execute(self.pool())
        .await?;

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM question_votes WHERE question_id = $1")
                .bind(question_id)
                .fetch_one(self.pool())
                .await?;
        Ok(count)
    }
}
