use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use pipeline::Generated;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MusicRequest { pub text: String }

/// `file_paths` holds a single path; the key name is part of the wire contract.
#[derive(Debug, Serialize)]
pub struct MusicResponse { pub file_paths: String }

impl TryFrom<Generated> for MusicResponse {
    type Error = ApiError;
    fn try_from(g: Generated) -> Result<Self, Self::Error> {
        let path = g.first_path().ok_or_else(|| ApiError::Internal("no audio was produced".to_string()))?;
        Ok(Self { file_paths: path.to_string_lossy().replace('\\', "/") })
    }
}

pub async fn health() -> &'static str { "ok" }

pub async fn generate_music(
    State(state): State<AppState>,
    payload: Result<Json<MusicRequest>, JsonRejection>,
) -> ApiResult<Json<MusicResponse>> {
    let Json(req) = payload.map_err(|rej| ApiError::Validation(rej.body_text()))?;
    let generated = state.pipeline.text_to_music(&req.text).await?;
    Ok(Json(generated.try_into()?))
}

pub async fn generate_music_from_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<MusicResponse>> {
    let mut multipart = multipart.map_err(|rej| ApiError::Validation(rej.body_text()))?;
    let mut image = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::Validation(e.body_text()))? {
        if field.name() == Some("image") {
            let bytes = field.bytes().await.map_err(|e| ApiError::Validation(e.body_text()))?;
            image = Some(bytes.to_vec());
            break;
        }
    }
    let image = image.ok_or_else(|| ApiError::Validation("missing multipart field `image`".to_string()))?;
    tracing::info!(bytes = image.len(), "image upload received");

    let generated = state.pipeline.image_to_music(image).await?;
    Ok(Json(generated.try_into()?))
}
