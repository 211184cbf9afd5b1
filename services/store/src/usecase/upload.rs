use crate::domain::repository::ImageStore;
use crate::error::StoreServiceError;

/// Accepted image types: extension plus the content type the client must
/// declare for it.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
];

pub struct StoreImageInput {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct StoreImageUseCase<S: ImageStore> {
    pub store: S,
    pub max_bytes: usize,
}

impl<S: ImageStore> StoreImageUseCase<S> {
    pub async fn execute(&self, input: StoreImageInput) -> Result<String, StoreServiceError> {
        let extension = input
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .ok_or(StoreServiceError::UnsupportedImageType)?;
        let allowed = ALLOWED_TYPES
            .iter()
            .any(|(ext, ct)| *ext == extension && *ct == input.content_type);
        if !allowed {
            return Err(StoreServiceError::UnsupportedImageType);
        }
        if input.bytes.is_empty() {
            return Err(StoreServiceError::MissingData);
        }
        if input.bytes.len() > self.max_bytes {
            return Err(StoreServiceError::ImageTooLarge);
        }
        self.store.save(&extension, &input.bytes).await
    }
}
