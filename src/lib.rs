pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod guard;
pub mod hackathons;
pub mod membership;
pub mod photos;
pub mod qna;
pub mod skills;
pub mod state;
pub mod storage;
pub mod store;
pub mod teams;

#[cfg(test)]
mod test_support;
