use serde::Deserialize;

use super::status::RequestStatus;

/// Body of `PUT /teams/:id/requests/:request_id`.
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    pub status: RequestStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}
