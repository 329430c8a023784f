use crate::utils::error::CustomError;
use crate::utils::multipart::parse_form;
use crate::utils::uploads::{FileValidator, StorageService};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// Upload a single image and return its public URL. Used by clients that
/// want the URL ahead of a post or comment submission.
/// POST /upload/single
pub async fn upload_single(
    payload: Multipart,
    storage: web::Data<StorageService>,
) -> Result<HttpResponse, CustomError> {
    let form = parse_form(payload).await?;

    let file = form
        .file
        .ok_or_else(|| CustomError::ValidationError("No file provided".to_string()))?;

    let url = storage.upload_file(file, &FileValidator::images()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "File uploaded successfully",
        "httpStatusCode": 200,
        "url": url
    })))
}
