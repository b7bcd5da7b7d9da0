use std::future::Future;

use anyhow::Context;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{error::AppError, storage::StorageClient};

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

pub struct PhotoUpload {
    pub body: Bytes,
    pub content_type: String,
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

/// Uploads a profile photo and returns its object key.
pub async fn upload_profile_photo(
    storage: &dyn StorageClient,
    user_id: Uuid,
    photo: PhotoUpload,
) -> Result<String, AppError> {
    let ext = ext_from_mime(&photo.content_type).ok_or_else(|| {
        AppError::validation(format!(
            "unsupported photo type {}; use jpeg, png, webp or heic",
            photo.content_type
        ))
    })?;
    if photo.body.is_empty() {
        return Err(AppError::validation("photo is empty"));
    }
    if photo.body.len() > MAX_PHOTO_BYTES {
        return Err(AppError::validation("photo exceeds 5 MiB"));
    }

    let key = format!("avatars/{}/{}.{}", user_id, Uuid::new_v4(), ext);
    storage
        .put_object(&key, photo.body, &photo.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    info!(%user_id, %key, "profile photo uploaded");
    Ok(key)
}

/// Removes a replaced photo. Failure only leaves an orphaned object behind.
pub async fn discard_photo(storage: &dyn StorageClient, key: &str) {
    if let Err(e) = storage.delete_object(key).await {
        warn!(error = %e, %key, "failed to delete profile photo");
    }
}

/// Awaits the row write that references `uploaded`; if it fails, the fresh
/// object is deleted so the bucket holds nothing the database doesn't know.
pub async fn discard_on_error<T, F>(
    storage: &dyn StorageClient,
    uploaded: Option<&str>,
    write: F,
) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    let result = write.await;
    if let (Err(_), Some(key)) = (&result, uploaded) {
        discard_photo(storage, key).await;
    }
    result
}
