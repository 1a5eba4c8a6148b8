//! `EntityForm` extractor for brand and store uploads.
//!
//! The multipart body carries the entity as JSON in a `data` field and an
//! optional image in a `logo` field.

use axum::extract::{FromRequest, Multipart, Request};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use validator::Validate;

use spooldb_core::AppError;
use spooldb_entity::LogoUpload;

use super::json::validate_input;
use crate::error::ApiError;
use crate::state::AppState;

/// Validated entity input plus the uploaded logo, if any.
#[derive(Debug, Clone)]
pub struct EntityForm<T> {
    pub input: T,
    pub logo: Option<LogoUpload>,
}

impl<T> FromRequest<AppState> for EntityForm<T>
where
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("Multipart error: {}", e.body_text())))?;
        let max_logo = state.config.catalog.max_logo_bytes;

        let mut data: Option<String> = None;
        let mut logo: Option<LogoUpload> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "data" => {
                    data = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                    );
                }
                "logo" => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let bytes: Bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                    if bytes.len() as u64 > max_logo {
                        return Err(AppError::validation(format!(
                            "Logo is {} bytes; the limit is {max_logo}",
                            bytes.len()
                        ))
                        .into());
                    }
                    // Browsers send an empty part when no file was chosen.
                    if !file_name.is_empty() && !bytes.is_empty() {
                        logo = Some(LogoUpload::new(file_name, bytes));
                    }
                }
                _ => {}
            }
        }

        let data = data.ok_or_else(|| AppError::validation("data field is required"))?;
        let input: T = serde_json::from_str(&data)
            .map_err(|e| AppError::validation(format!("Invalid data field: {e}")))?;
        validate_input(&input)?;

        Ok(Self { input, logo })
    }
}
