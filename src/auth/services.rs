use anyhow::Context;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, ProfileUpdateRequest, PublicUser, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, is_valid_email, normalize_email, verify_password, MIN_PASSWORD_LEN},
    repo::UserRepo,
    repo_types::{NewUser, ProfileChanges, User},
};
use crate::{
    error::AppError,
    photos::{self, PhotoUpload},
    state::AppState,
    store::USERS_EMAIL_KEY,
};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn issue_tokens(st: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let keys = JwtKeys::from_config(&st.config.jwt);
    let access_token = keys.sign_access(user.id).context("sign access token")?;
    let refresh_token = keys.sign_refresh(user.id).context("sign refresh token")?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer",
        user: PublicUser::from_user(user, st.storage.as_ref()),
    })
}

pub async fn register(st: &AppState, req: RegisterRequest) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }

    let password_hash = hash_password(&req.password)?;
    let new = NewUser {
        email,
        password_hash,
        name,
        university: non_blank(req.university),
        skills: req.skills.into_vec(),
    };

    // The unique constraint decides; no read-before-write.
    let user = st.store.insert_user(new).await.map_err(|e| {
        if e.is_unique(USERS_EMAIL_KEY) {
            AppError::DuplicateEmail
        } else {
            e.into()
        }
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    issue_tokens(st, user)
}

pub async fn authenticate(
    st: &AppState,
    email: &str,
    password: &str,
) -> Result<AuthResponse, AppError> {
    let email = normalize_email(email);

    let Some(user) = st.store.find_user_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user logged in");
    issue_tokens(st, user)
}

pub async fn refresh(st: &AppState, refresh_token: &str) -> Result<AuthResponse, AppError> {
    let keys = JwtKeys::from_config(&st.config.jwt);
    let claims = keys.verify_refresh(refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::TokenInvalid
    })?;

    // A token may outlive its user row.
    let user = st
        .store
        .find_user(claims.sub)
        .await?
        .ok_or(AppError::TokenInvalid)?;
    issue_tokens(st, user)
}

pub async fn get_profile(st: &AppState, user_id: Uuid) -> Result<PublicUser, AppError> {
    let user = st
        .store
        .find_user(user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(PublicUser::from_user(user, st.storage.as_ref()))
}

/// Applies a profile update to the caller's own row.
pub async fn update_profile(
    st: &AppState,
    user_id: Uuid,
    req: ProfileUpdateRequest,
    photo: Option<PhotoUpload>,
) -> Result<PublicUser, AppError> {
    let name = match req.name {
        Some(n) if n.trim().is_empty() => return Err(AppError::validation("Name cannot be empty")),
        Some(n) => Some(n.trim().to_string()),
        None => None,
    };

    let current = st
        .store
        .find_user(user_id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    let photo_key = match photo {
        Some(p) => Some(photos::upload_profile_photo(st.storage.as_ref(), user_id, p).await?),
        None => None,
    };

    let changes = ProfileChanges {
        name,
        university: req.university.map(|u| non_blank(Some(u))),
        skills: req.skills.map(|s| s.into_vec()),
        photo_key: photo_key.clone(),
    };

    let updated = photos::discard_on_error(st.storage.as_ref(), photo_key.as_deref(), async {
        st.store
            .update_profile(user_id, changes)
            .await?
            .ok_or(AppError::NotFound("user"))
    })
    .await?;

    if let (Some(_), Some(old)) = (&photo_key, current.photo_key.as_deref()) {
        photos::discard_photo(st.storage.as_ref(), old).await;
    }

    info!(%user_id, "profile updated");
    Ok(PublicUser::from_user(updated, st.storage.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillList;

    fn registration(email: &str, skills: &[&str]) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "password123".into(),
            name: "Ada".into(),
            university: Some("  ".into()),
            skills: SkillList::from_iter(skills.iter().copied()),
        }
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let st = AppState::fake();
        let reg = register(&st, registration("A@X.com", &[])).await.unwrap();
        assert_eq!(reg.user.email, "a@x.com");
        assert_eq!(reg.user.university, None);

        let login = authenticate(&st, "a@x.com", "password123").await.unwrap();
        assert_eq!(login.user.id, reg.user.id);
        assert_eq!(login.token_type, "Bearer");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let st = AppState::fake();
        register(&st, registration("a@x.com", &[])).await.unwrap();
        let err = register(&st, registration(" a@X.COM", &[])).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let st = AppState::fake();
        let mut bad = registration("not-an-email", &[]);
        assert!(matches!(register(&st, bad).await, Err(AppError::Validation(_))));

        bad = registration("a@x.com", &[]);
        bad.password = "short".into();
        assert!(matches!(register(&st, bad).await, Err(AppError::Validation(_))));

        bad = registration("a@x.com", &[]);
        bad.name = "   ".into();
        assert!(matches!(register(&st, bad).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn wrong_email_and_wrong_password_look_the_same() {
        let st = AppState::fake();
        register(&st, registration("a@x.com", &[])).await.unwrap();

        let unknown = authenticate(&st, "b@x.com", "password123").await.unwrap_err();
        let wrong = authenticate(&st, "a@x.com", "password124").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert!(matches!(wrong, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn skills_round_trip_through_profile() {
        let st = AppState::fake();
        let reg = register(&st, registration("a@x.com", &["React", "Go"])).await.unwrap();
        let profile = get_profile(&st, reg.user.id).await.unwrap();
        assert_eq!(profile.skills, vec!["React", "Go"]);
    }

    #[tokio::test]
    async fn refresh_issues_new_pair_for_refresh_tokens_only() {
        let st = AppState::fake();
        let reg = register(&st, registration("a@x.com", &[])).await.unwrap();

        let renewed = refresh(&st, &reg.refresh_token).await.unwrap();
        assert_eq!(renewed.user.id, reg.user.id);

        let err = refresh(&st, &reg.access_token).await.unwrap_err();
        assert!(matches!(err, AppError::TokenInvalid));
    }

    #[tokio::test]
    async fn update_profile_changes_only_given_fields() {
        let st = AppState::fake();
        let reg = register(&st, registration("a@x.com", &["Go"])).await.unwrap();

        let updated = update_profile(
            &st,
            reg.user.id,
            ProfileUpdateRequest {
                university: Some("MIT".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.university.as_deref(), Some("MIT"));
        assert_eq!(updated.skills, vec!["Go"]);

        let cleared = update_profile(
            &st,
            reg.user.id,
            ProfileUpdateRequest {
                university: Some(String::new()),
                skills: Some(SkillList::parse_delimited("Rust, SQL")),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
        assert_eq!(cleared.university, None);
        assert_eq!(cleared.skills, vec!["Rust", "SQL"]);
    }

    #[tokio::test]
    async fn update_profile_with_photo_returns_url() {
        let st = AppState::fake();
        let reg = register(&st, registration("a@x.com", &[])).await.unwrap();

        let updated = update_profile(
            &st,
            reg.user.id,
            ProfileUpdateRequest::default(),
            Some(PhotoUpload {
                body: bytes::Bytes::from_static(b"jpeg-bytes"),
                content_type: "image/jpeg".into(),
            }),
        )
        .await
        .unwrap();

        let url = updated.profile_photo.expect("photo url");
        assert!(url.starts_with(&format!("https://fake.local/avatars/{}/", reg.user.id)));
        assert_eq!(get_profile(&st, reg.user.id).await.unwrap().profile_photo, Some(url));
    }

    #[tokio::test]
    async fn update_profile_rejects_blank_name() {
        let st = AppState::fake();
        let reg = register(&st, registration("a@x.com", &[])).await.unwrap();
        let err = update_profile(
            &st,
            reg.user.id,
            ProfileUpdateRequest {
                name: Some(" ".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
