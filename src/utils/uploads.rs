use crate::utils::error::CustomError;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::Deserialize;
use std::env;

/// Length of the random token prefixing every storage key. Collisions are
/// treated as negligible; there is no retry-on-collision logic.
const KEY_TOKEN_LEN: usize = 16;

/// Object storage configuration loaded from environment variables
pub struct StorageConfig {
    pub base_url: String,
    pub api_key: String,
    pub bucket: String,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            base_url: env::var("STORAGE_URL").map_err(|_| "STORAGE_URL is required")?,
            api_key: env::var("STORAGE_API_KEY").map_err(|_| "STORAGE_API_KEY is required")?,
            bucket: env::var("STORAGE_BUCKET").unwrap_or_else(|_| "blog-images".to_string()),
        })
    }

    /// Endpoint an object is written to
    pub fn object_url(&self, key: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            key
        )
    }

    /// Publicly reachable URL for a stored object
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}

#[derive(Debug, Deserialize)]
struct StorageErrorResponse {
    message: String,
}

/// Client for the external object store holding post and comment images
pub struct StorageService {
    config: StorageConfig,
    client: reqwest::Client,
}

impl StorageService {
    pub fn new() -> Result<Self, String> {
        let config = StorageConfig::from_env()?;
        let client = reqwest::Client::new();
        Ok(Self { config, client })
    }

    pub fn with_config(config: StorageConfig) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// Derive a storage key from a file name: a random alphanumeric token
    /// keeping the original extension. A name without an extension is
    /// rejected before anything is sent to the store.
    pub fn derive_key(file_name: &str) -> Result<String, CustomError> {
        let extension = extension_of(file_name).ok_or_else(|| {
            CustomError::ValidationError("File name has no extension".to_string())
        })?;

        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(KEY_TOKEN_LEN)
            .map(char::from)
            .collect();

        Ok(format!("{}.{}", token, extension))
    }

    /// Write raw bytes under the given key. Failures propagate to the caller
    /// with no retry and no partial cleanup; the caller decides whether to
    /// abort the enclosing submission.
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<(), CustomError> {
        let response = self
            .client
            .post(self.config.object_url(key))
            .bearer_auth(&self.config.api_key)
            .header(
                reqwest::header::CONTENT_TYPE,
                content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
            )
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to send upload request: {}", e))
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            let message = response
                .json::<StorageErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|e| format!("Failed to parse error response: {}", e));
            Err(CustomError::InternalServerError(format!(
                "Upload failed: {}",
                message
            )))
        }
    }

    /// Validate, store and resolve a public URL for one file. The store
    /// completes before the URL is handed back, so a record referencing the
    /// URL can never point at an unfinished upload.
    pub async fn upload_file(
        &self,
        file: FileUpload,
        validator: &FileValidator,
    ) -> Result<String, CustomError> {
        validator.validate(&file)?;
        let key = Self::derive_key(&file.file_name)?;
        self.upload(&key, file.data, file.content_type).await?;
        Ok(self.config.public_url(&key))
    }
}

/// Resolve the image an edited post or comment ends up with: a freshly
/// uploaded URL wins, otherwise an explicit removal clears it, otherwise
/// the existing URL is retained.
pub fn resolve_image_url(
    new_upload: Option<String>,
    remove: bool,
    existing: Option<String>,
) -> Option<String> {
    match new_upload {
        Some(url) => Some(url),
        None if remove => None,
        None => existing,
    }
}

fn extension_of(file_name: &str) -> Option<String> {
    let ext = file_name.rsplit('.').next()?;
    if ext.is_empty() || ext == file_name {
        return None;
    }
    Some(ext.to_lowercase())
}

/// A file extracted from a multipart submission
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

impl FileUpload {
    pub fn new(file_name: String, data: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            file_name,
            data,
            content_type,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn extension(&self) -> Option<String> {
        extension_of(&self.file_name)
    }
}

/// File validation applied before anything reaches the object store
#[derive(Debug, Clone)]
pub struct FileValidator {
    pub allowed_extensions: Vec<String>,
    pub max_file_size: usize,
}

impl FileValidator {
    /// Validator for post and comment images
    pub fn images() -> Self {
        Self {
            allowed_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "gif".to_string(),
                "webp".to_string(),
                "svg".to_string(),
                "bmp".to_string(),
            ],
            max_file_size: 10 * 1024 * 1024,
        }
    }

    pub fn validate(&self, file: &FileUpload) -> Result<(), CustomError> {
        if file.data.is_empty() {
            return Err(CustomError::ValidationError("File is empty".to_string()));
        }

        let extension = file.extension().ok_or_else(|| {
            CustomError::ValidationError("File name has no extension".to_string())
        })?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(CustomError::ValidationError(format!(
                "Invalid file type '{}'. Allowed types: {}",
                extension,
                self.allowed_extensions.join(", ")
            )));
        }

        if file.size() > self.max_file_size {
            return Err(CustomError::ValidationError(format!(
                "File too large. Maximum size: {} bytes, file size: {} bytes",
                self.max_file_size,
                file.size()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> FileUpload {
        FileUpload::new(name.to_string(), vec![0u8; 128], Some("image/png".into()))
    }

    #[test]
    fn derived_key_keeps_extension_behind_random_token() {
        let key = StorageService::derive_key("holiday photo.PNG").unwrap();
        let (token, ext) = key.rsplit_once('.').unwrap();
        assert_eq!(ext, "png");
        assert_eq!(token.len(), KEY_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn derived_keys_differ_between_calls() {
        let a = StorageService::derive_key("a.jpg").unwrap();
        let b = StorageService::derive_key("a.jpg").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn extensionless_name_is_rejected() {
        assert!(StorageService::derive_key("no-extension").is_err());
        assert!(StorageService::derive_key("trailing-dot.").is_err());
    }

    #[test]
    fn validator_accepts_small_png() {
        assert!(FileValidator::images().validate(&image("a.png")).is_ok());
    }

    #[test]
    fn validator_rejects_disallowed_extension() {
        assert!(FileValidator::images().validate(&image("a.exe")).is_err());
    }

    #[test]
    fn validator_rejects_empty_file() {
        let file = FileUpload::new("a.png".into(), Vec::new(), None);
        assert!(FileValidator::images().validate(&file).is_err());
    }

    #[test]
    fn validator_rejects_oversized_file() {
        let mut validator = FileValidator::images();
        validator.max_file_size = 16;
        assert!(validator.validate(&image("a.png")).is_err());
    }

    #[test]
    fn new_upload_wins_over_removal_and_existing() {
        assert_eq!(
            resolve_image_url(Some("new.png".into()), true, Some("old.png".into())),
            Some("new.png".to_string())
        );
        assert_eq!(
            resolve_image_url(Some("new.png".into()), false, None),
            Some("new.png".to_string())
        );
    }

    #[test]
    fn remove_photo_without_new_file_clears_the_image() {
        assert_eq!(resolve_image_url(None, true, Some("old.png".into())), None);
        assert_eq!(resolve_image_url(None, true, None), None);
    }

    #[test]
    fn untouched_edit_retains_the_existing_image() {
        assert_eq!(
            resolve_image_url(None, false, Some("old.png".into())),
            Some("old.png".to_string())
        );
        assert_eq!(resolve_image_url(None, false, None), None);
    }

    #[test]
    fn urls_are_built_from_bucket_and_key() {
        let service = StorageService::with_config(StorageConfig {
            base_url: "https://files.example.com/storage/v1/".to_string(),
            api_key: "secret".to_string(),
            bucket: "blog-images".to_string(),
        });
        assert_eq!(
            service.config.object_url("abc.png"),
            "https://files.example.com/storage/v1/object/blog-images/abc.png"
        );
        assert_eq!(
            service.config.public_url("abc.png"),
            "https://files.example.com/storage/v1/object/public/blog-images/abc.png"
        );
    }
}
