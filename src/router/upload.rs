//! Image upload endpoint for the admin dashboard.

use axum::Json;
use axum::extract::{Multipart, Query, State};
use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors};

use crate::AppState;
use crate::error::Result;
use crate::guard::AdminUser;
use crate::upload;

const DEFAULT_FOLDER: &str = "general";

#[derive(Debug, Deserialize)]
pub struct FolderQuery {
    folder: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub image_url: String,
}

/// Handler storing one image and returning its public URL.
pub async fn handler(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(query): Query<FolderQuery>,
    mut multipart: Multipart,
) -> Result<Json<Response>> {
    let folder = query.folder.as_deref().unwrap_or(DEFAULT_FOLDER);

    while let Some(field) = multipart.next_field().await? {
        // The first file part is the image; text parts are ignored.
        if field.file_name().is_none() {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;

        let image_url = upload::store_image(
            &state.config.uploads,
            folder,
            content_type.as_deref(),
            &bytes,
        )
        .await?;

        return Ok(Json(Response { image_url }));
    }

    let mut errors = ValidationErrors::new();
    errors.add(
        "image",
        ValidationError::new("image").with_message("Image file is required.".into()),
    );
    Err(errors.into())
}
