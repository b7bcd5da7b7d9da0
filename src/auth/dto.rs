use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::User;
use crate::{skills::SkillList, storage::StorageClient};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub skills: SkillList,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// JSON body of `PUT /auth/profile`; multipart uploads fill the same shape.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub university: Option<String>,
    pub skills: Option<SkillList>,
}

/// Response returned after login, register or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub university: Option<String>,
    pub skills: Vec<String>,
    pub profile_photo: Option<String>,
}

impl PublicUser {
    pub fn from_user(user: User, storage: &dyn StorageClient) -> Self {
        Self {
            profile_photo: user.photo_key.as_deref().map(|k| storage.object_url(k)),
            id: user.id,
            email: user.email,
            name: user.name,
            university: user.university,
            skills: user.skills,
        }
    }
}
