use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::DecideRequest,
    repo::RequestRepo,
    repo_types::{JoinRequest, MyRequest, RequestWithApplicant, StatusUpdate, UpdateOutcome},
    status::RequestStatus,
};
use crate::{
    auth::repo::UserRepo, error::AppError, guard, hackathons::repo::HackathonRepo,
    state::AppState, store::JOIN_REQUESTS_TEAM_USER_KEY, teams::services::load_team,
};

/// Files a `pending` request for `actor` to join `team_id`.
pub async fn request_join(st: &AppState, actor: Uuid, team_id: Uuid) -> Result<JoinRequest, AppError> {
    load_team(st, team_id).await?;
    // A valid token whose user row is gone is treated like no token.
    st.store
        .find_user(actor)
        .await?
        .ok_or(AppError::TokenInvalid)?;

    match st.store.insert_request(team_id, actor).await {
        Ok(request) => {
            info!(request_id = %request.id, %team_id, user_id = %actor, "join request created");
            Ok(request)
        }
        Err(e) if e.is_unique(JOIN_REQUESTS_TEAM_USER_KEY) => {
            warn!(%team_id, user_id = %actor, "duplicate join request");
            Err(AppError::DuplicateRequest)
        }
        Err(e) => Err(e.into()),
    }
}

/// Leader's decision on one of the team's requests.
///
/// Approving checks the hackathon's `max_team_size` against the approved
/// count; rejecting an approved request removes that member.
pub async fn decide(
    st: &AppState,
    leader: Uuid,
    team_id: Uuid,
    request_id: Uuid,
    req: DecideRequest,
) -> Result<JoinRequest, AppError> {
    let team = load_team(st, team_id).await?;
    guard::ensure_team_leader(leader, &team)?;

    if req.status == RequestStatus::Pending {
        return Err(AppError::validation("status must be approved or rejected"));
    }

    let current = st
        .store
        .find_request(request_id)
        .await?
        .filter(|r| r.team_id == team_id)
        .ok_or(AppError::NotFound("join request"))?;

    guard::ensure_not_leader_removal(&team, &current, req.status)?;
    if !current.status.can_transition_to(req.status) {
        return Err(AppError::validation(format!(
            "cannot move a {} request to {}",
            current.status, req.status
        )));
    }

    let (rejection_reason, capacity) = match req.status {
        RequestStatus::Rejected => (
            req.rejection_reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            None,
        ),
        _ => {
            let hackathon = st
                .store
                .find_hackathon(team.hackathon_id)
                .await?
                .ok_or(AppError::NotFound("hackathon"))?;
            (None, Some(i64::from(hackathon.hackathon.max_team_size)))
        }
    };

    let update = StatusUpdate {
        team_id,
        request_id,
        expected: current.status,
        status: req.status,
        rejection_reason,
        capacity,
    };

    let outcome = st.store.update_request_status(update).await?;
    settle(outcome, team_id, request_id, current.status)
}

fn settle(
    outcome: UpdateOutcome,
    team_id: Uuid,
    request_id: Uuid,
    from: RequestStatus,
) -> Result<JoinRequest, AppError> {
    match outcome {
        UpdateOutcome::Applied(request) => {
            info!(
                %request_id,
                %team_id,
                %from,
                to = %request.status,
                "join request decided"
            );
            Ok(request)
        }
        UpdateOutcome::TeamFull => {
            warn!(%team_id, %request_id, "approval refused, team is full");
            Err(AppError::TeamFull)
        }
        UpdateOutcome::Stale => {
            warn!(%team_id, %request_id, "join request changed during decision");
            Err(AppError::Conflict(
                "join request changed meanwhile; reload and retry".into(),
            ))
        }
    }
}

pub async fn list_requests(
    st: &AppState,
    leader: Uuid,
    team_id: Uuid,
) -> Result<Vec<RequestWithApplicant>, AppError> {
    let team = load_team(st, team_id).await?;
    guard::ensure_team_leader(leader, &team)?;
    Ok(st.store.list_team_requests(team_id).await?)
}

pub async fn list_my_requests(st: &AppState, actor: Uuid) -> Result<Vec<MyRequest>, AppError> {
    Ok(st.store.list_user_requests(actor).await?)
}
