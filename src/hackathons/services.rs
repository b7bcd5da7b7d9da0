use tracing::info;
use uuid::Uuid;

use super::{
    dto::CreateHackathonRequest,
    repo::HackathonRepo,
    repo_types::{HackathonSummary, NewHackathon},
};
use crate::{auth::repo::UserRepo, error::AppError, state::AppState};

const MAX_TITLE_LEN: usize = 200;

fn validate(req: &CreateHackathonRequest) -> Result<(), AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if req.max_team_size < 1 {
        return Err(AppError::validation("max_team_size must be a positive integer"));
    }
    if let Some(url) = req.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::validation("url must start with http:// or https://"));
        }
    }
    Ok(())
}

pub async fn create(
    st: &AppState,
    actor: Uuid,
    req: CreateHackathonRequest,
) -> Result<HackathonSummary, AppError> {
    validate(&req)?;

    // A valid token whose user row is gone is treated like no token.
    let organizer = st
        .store
        .find_user(actor)
        .await?
        .ok_or(AppError::TokenInvalid)?;

    let hackathon = st
        .store
        .insert_hackathon(NewHackathon {
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            start_date: req.start_date,
            max_team_size: req.max_team_size,
            kind: req.kind,
            url: req
                .url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            created_by: actor,
            organizer_name: organizer.name,
        })
        .await?;

    info!(hackathon_id = %hackathon.id, created_by = %actor, "hackathon created");
    Ok(HackathonSummary {
        hackathon,
        current_members: 0,
    })
}

pub async fn list(st: &AppState) -> Result<Vec<HackathonSummary>, AppError> {
    Ok(st.store.list_hackathons().await?)
}

pub async fn get(st: &AppState, id: Uuid) -> Result<HackathonSummary, AppError> {
    st.store
        .find_hackathon(id)
        .await?
        .ok_or(AppError::NotFound("hackathon"))
}
