use axum::{extract::State, Json};
use serde::Deserialize;

use crate::documents::GeneratedDocuments;
use crate::errors::AppError;
use crate::jobs::JobRecord;
use crate::profile::models::Profile;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GenerateDocumentsRequest {
    pub user_id: String,
    pub job: JobRecord,
    /// Overrides the stored profile when present.
    #[serde(default)]
    pub profile: Option<Profile>,
}

/// POST /api/v1/documents/generate
pub async fn handle_generate_documents(
    State(state): State<AppState>,
    Json(req): Json<GenerateDocumentsRequest>,
) -> Result<Json<GeneratedDocuments>, AppError> {
    let profile = match req.profile {
        Some(profile) => profile,
        None => state.profiles.get(&req.user_id).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "No profile for user {}; upload a resume first",
                req.user_id
            ))
        })?,
    };

    let documents = state
        .documents
        .generate(&profile, &req.job)
        .await
        .map_err(|e| AppError::Llm(format!("{e:#}")))?;
    Ok(Json(documents))
}
