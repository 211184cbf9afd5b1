use axum::{Json, extract::Multipart, extract::State};
use serde::Serialize;

use frostline_auth_types::identity::IdentityHeaders;
use frostline_auth_types::policy::require_admin;

use crate::error::StoreServiceError;
use crate::state::AppState;
use crate::usecase::upload::{StoreImageInput, StoreImageUseCase};

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

// ── POST /uploads ────────────────────────────────────────────────────────────

pub async fn upload_image(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, StoreServiceError> {
    require_admin(&identity).map_err(|_| StoreServiceError::Forbidden)?;

    let field = multipart
        .next_field()
        .await
        .map_err(|_| StoreServiceError::MissingData)?
        .ok_or(StoreServiceError::MissingData)?;

    let filename = field.file_name().unwrap_or_default().to_owned();
    let content_type = field.content_type().unwrap_or_default().to_owned();
    // The body-limit layer aborts oversized streams before this read finishes.
    let bytes = field
        .bytes()
        .await
        .map_err(|_| StoreServiceError::ImageTooLarge)?;

    let usecase = StoreImageUseCase {
        store: state.image_store(),
        max_bytes: state.upload_max_bytes,
    };
    let url = usecase
        .execute(StoreImageInput {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        })
        .await?;
    Ok(Json(UploadResponse { url }))
}
