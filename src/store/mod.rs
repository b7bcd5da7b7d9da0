//! Persistence seam: one repository trait per domain module, implemented by
//! [`PgStore`] in production.

use crate::{
    auth::repo::UserRepo, hackathons::repo::HackathonRepo, membership::repo::RequestRepo,
    qna::repo::QnaRepo, teams::repo::TeamRepo,
};

mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const JOIN_REQUESTS_TEAM_USER_KEY: &str = "join_requests_team_user_key";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint {constraint} violated")]
    UniqueViolation { constraint: String },
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_unique(&self, name: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        StoreError::Backend(anyhow::Error::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Everything the handlers need from persistence.
pub trait Store: UserRepo + HackathonRepo + TeamRepo + RequestRepo + QnaRepo {}

impl<T> Store for T where T: UserRepo + HackathonRepo + TeamRepo + RequestRepo + QnaRepo {}
