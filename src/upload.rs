//! Image upload intake.
//!
//! Validates type and size, then writes the bytes under a unique name in
//! the configured uploads directory. Files are never rewritten; uniqueness
//! comes from the generated name.

use std::sync::OnceLock;

use regex_lite::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::config::Uploads;
use crate::error::{Result, ServerError};

const ALLOWED_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

fn folder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[a-z0-9-]+$").unwrap())
}

fn invalid(field: &'static str, message: &'static str) -> ServerError {
    let mut errors = ValidationErrors::new();
    errors.add(
        field,
        ValidationError::new(field).with_message(message.into()),
    );
    errors.into()
}

/// Map a MIME type to the stored file extension.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}

/// Check a target folder segment before it touches the filesystem.
pub fn validate_folder(folder: &str) -> Result<()> {
    if folder_pattern().is_match(folder) {
        Ok(())
    } else {
        Err(invalid("folder", "Folder must match [a-z0-9-]+."))
    }
}

/// Write an uploaded image and return its public URL path.
pub async fn store_image(
    uploads: &Uploads,
    folder: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<String> {
    validate_folder(folder)?;

    let extension = content_type
        .and_then(extension_for)
        .ok_or_else(|| invalid("image", "Image must be JPEG, PNG, WebP or GIF."))?;

    if bytes.is_empty() {
        return Err(invalid("image", "Image is empty."));
    }
    if bytes.len() > uploads.max_bytes {
        return Err(invalid("image", "Image exceeds the size limit."));
    }

    let name = format!("{}.{extension}", uuid::Uuid::new_v4());
    let directory = uploads.directory.join(folder);

    tokio::fs::create_dir_all(&directory)
        .await
        .map_err(|err| ServerError::internal("cannot create upload dir", err))?;
    tokio::fs::write(directory.join(&name), bytes)
        .await
        .map_err(|err| ServerError::internal("cannot write upload", err))?;

    tracing::debug!(%folder, %name, size = bytes.len(), "image stored");

    Ok(format!("/uploads/{folder}/{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mapping() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/svg+xml"), None);
        assert_eq!(extension_for("application/pdf"), None);
    }

    #[test]
    fn test_folder_validation() {
        assert!(validate_folder("members").is_ok());
        assert!(validate_folder("team-photos").is_ok());
        assert!(validate_folder("../escape").is_err());
        assert!(validate_folder("UPPER").is_err());
        assert!(validate_folder("").is_err());
    }

    #[tokio::test]
    async fn test_store_and_reject() {
        let dir = std::env::temp_dir().join(format!(
            "arive-upload-test-{}",
            uuid::Uuid::new_v4()
        ));
        let uploads = Uploads {
            directory: dir.clone(),
            max_bytes: 16,
        };

        let url = store_image(&uploads, "members", Some("image/png"), &[1u8; 8])
            .await
            .unwrap();
        assert!(url.starts_with("/uploads/members/"));
        assert!(url.ends_with(".png"));

        let stored = dir.join("members").join(url.rsplit('/').next().unwrap());
        assert!(stored.is_file());

        // Over the cap.
        assert!(
            store_image(&uploads, "members", Some("image/png"), &[1u8; 32])
                .await
                .is_err()
        );
        // Unknown MIME type.
        assert!(
            store_image(&uploads, "members", Some("text/html"), &[1u8; 8])
                .await
                .is_err()
        );

        tokio::fs::remove_dir_all(dir).await.ok();
    }
}
