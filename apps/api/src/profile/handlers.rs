use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::profile::models::Profile;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub profile: Profile,
    pub validation_issues: Vec<String>,
}

impl ProfileResponse {
    fn new(user_id: String, profile: Profile) -> Self {
        let validation_issues = profile.validate();
        Self {
            user_id,
            profile,
            validation_issues,
        }
    }
}

/// POST /api/v1/profile/upload  (multipart: `user_id`, `file`)
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut user_id: Option<String> = None;
    let mut upload: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("user_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid user_id field: {e}")))?;
                user_id = Some(value.trim().to_string());
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("resume.txt").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file field: {e}")))?;
                upload = Some((filename, data));
            }
            _ => {}
        }
    }

    let user_id = user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;
    let (filename, data) =
        upload.ok_or_else(|| AppError::Validation("file is required".to_string()))?;

    let profile = state.resume_parser.process_upload(&filename, &data).await?;
    state.profiles.set(&user_id, &profile).await?;
    info!("Stored profile for user {user_id} from {filename}");

    Ok(Json(ProfileResponse::new(user_id, profile)))
}

/// GET /api/v1/profile/:user_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .profiles
        .get(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {user_id}")))?;
    Ok(Json(ProfileResponse::new(user_id, profile)))
}

/// PUT /api/v1/profile/:user_id: replaces the stored profile.
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(profile): Json<Profile>,
) -> Result<Json<ProfileResponse>, AppError> {
    state.profiles.set(&user_id, &profile).await?;
    Ok(Json(ProfileResponse::new(user_id, profile)))
}

/// DELETE /api/v1/profile/:user_id
pub async fn handle_delete_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.profiles.delete(&user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No profile for user {user_id}")))
    }
}
