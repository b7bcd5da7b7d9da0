use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{AuthResponse, LoginRequest, ProfileUpdateRequest, PublicUser, RefreshRequest, RegisterRequest},
    extractors::AuthUser,
    services,
};
use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    photos::{PhotoUpload, MAX_PHOTO_BYTES},
    skills::SkillList,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_me))
        .route(
            "/auth/profile",
            put(update_profile).layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES + 64 * 1024)),
        )
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let resp = services::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let resp = services::authenticate(&state, &payload.email, &payload.password).await?;
    Ok(Json(resp))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(services::refresh(&state, &payload.refresh_token).await?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    Ok(Json(services::get_profile(&state, user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<PublicUser>, AppError> {
    Ok(Json(services::get_profile(&state, id).await?))
}

#[instrument(skip(state, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    form: ProfileForm,
) -> Result<Json<PublicUser>, AppError> {
    let user = services::update_profile(&state, user_id, form.fields, form.photo).await?;
    Ok(Json(user))
}

/// Profile update body: JSON, or `multipart/form-data` when a photo is attached.
///
/// Multipart fields: `name`, `university`, `skills` (comma separated, may
/// repeat) and `profile_photo` (file). A `profile_photo` part without a file
/// name is the client echoing the current URL and is ignored.
pub struct ProfileForm {
    fields: ProfileUpdateRequest,
    photo: Option<PhotoUpload>,
}

fn multipart_err(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(e.body_text())
}

#[async_trait]
impl<S> FromRequest<S> for ProfileForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let AppJson(fields) = AppJson::<ProfileUpdateRequest>::from_request(req, state).await?;
            return Ok(Self {
                fields,
                photo: None,
            });
        }

        let mut mp = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let mut fields = ProfileUpdateRequest::default();
        let mut skills: Option<Vec<String>> = None;
        let mut photo = None;

        while let Some(field) = mp.next_field().await.map_err(multipart_err)? {
            let name = field.name().map(|s| s.to_string());
            match name.as_deref() {
                Some("name") => fields.name = Some(field.text().await.map_err(multipart_err)?),
                Some("university") => {
                    fields.university = Some(field.text().await.map_err(multipart_err)?)
                }
                Some("skills") | Some("skills[]") => {
                    let text = field.text().await.map_err(multipart_err)?;
                    skills
                        .get_or_insert_with(Vec::new)
                        .extend(SkillList::parse_delimited(&text).into_vec());
                }
                Some("profile_photo") if field.file_name().is_some() => {
                    let content_type = field
                        .content_type()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "application/octet-stream".into());
                    let body = field.bytes().await.map_err(multipart_err)?;
                    photo = Some(PhotoUpload { body, content_type });
                }
                _ => {}
            }
        }
        fields.skills = skills.map(SkillList::from_iter);

        Ok(Self { fields, photo })
    }
}
