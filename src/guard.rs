//! Authorization rules for mutating operations.
//!
//! Identity itself is established by [`crate::auth::extractors::AuthUser`];
//! these checks run afterwards against the loaded entity.

use tracing::warn;
use uuid::Uuid;

use crate::{
    error::AppError,
    membership::{repo_types::JoinRequest, status::RequestStatus},
    teams::repo_types::Team,
};

/// Only the leader may edit or delete a team or decide on its requests.
pub fn ensure_team_leader(actor: Uuid, team: &Team) -> Result<(), AppError> {
    if team.leader_id == actor {
        Ok(())
    } else {
        warn!(%actor, team_id = %team.id, "non-leader attempted a leader-only operation");
        Err(AppError::Forbidden)
    }
}

/// The leader's own membership can never be rejected.
pub fn ensure_not_leader_removal(
    team: &Team,
    request: &JoinRequest,
    next: RequestStatus,
) -> Result<(), AppError> {
    if request.user_id == team.leader_id && next == RequestStatus::Rejected {
        return Err(AppError::validation("the team leader cannot be removed"));
    }
    Ok(())
}
