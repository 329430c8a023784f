use crate::comment::model::{Comment, normalize_content};
use crate::comment::service::CommentService;
use crate::middleware::auth::get_user_id_from_request;
use crate::post::post_service::PostService;
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use crate::utils::model::ConfirmQuery;
use crate::utils::multipart::parse_form;
use crate::utils::uploads::{FileValidator, StorageService, resolve_image_url};
use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, web};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

/// Create a new comment on a post from a multipart submission (post_id,
/// optional content, optional image file). Text and image may not both be
/// absent in spirit, but an image-only comment is valid; blank text is
/// stored as null.
/// POST /comments
pub async fn create_comment(
    req: HttpRequest,
    payload: Multipart,
    comment_service: web::Data<CommentService>,
    post_service: web::Data<PostService>,
    user_service: web::Data<UserService>,
    storage: web::Data<StorageService>,
) -> Result<HttpResponse, CustomError> {
    let user_id_str = get_user_id_from_request(&req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;

    let author_id = ObjectId::parse_str(&user_id_str)
        .map_err(|_| CustomError::BadRequestError("Invalid user ID".to_string()))?;

    let author = user_service
        .get_user_by_id(&author_id)
        .await?
        .ok_or_else(|| CustomError::UnauthorizedError("Account not found".to_string()))?;

    let form = parse_form(payload).await?;
    let post_id_str = form.required_text("post_id")?;

    // Comments always hang off an existing post
    let parent = post_service
        .get_post(post_id_str)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("Post not found".to_string()))?;

    let content = normalize_content(form.text("content"));

    // Upload settles before the insert so the record never references an
    // unfinished upload
    let image_url = match form.file {
        Some(file) => Some(storage.upload_file(file, &FileValidator::images()).await?),
        None => None,
    };

    let now = chrono::Utc::now();
    let comment = Comment {
        id: None,
        post_id: parent.id,
        user_id: author_id,
        author_name: author.author_name(),
        content,
        image_url,
        created_at: now,
        updated_at: now,
    };

    let comment_id = comment_service.add_comment(comment).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Comment created successfully",
        "httpStatusCode": 201,
        "comment_id": comment_id.to_hex()
    })))
}

/// The comment thread for a post, oldest first
/// GET /comments/post/{post_id}
pub async fn get_post_comments(
    comment_service: web::Data<CommentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let post_id = ObjectId::parse_str(path.into_inner())
        .map_err(|_| CustomError::BadRequestError("Invalid post ID".to_string()))?;

    let comments = comment_service.get_comments_for_post(&post_id).await?;
    let count = comments.len();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comments retrieved successfully",
        "httpStatusCode": 200,
        "count": count,
        "data": comments
    })))
}

/// Read-time comment count for a post
/// GET /comments/count/{post_id}
pub async fn get_comment_count(
    comment_service: web::Data<CommentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let post_id = ObjectId::parse_str(path.into_inner())
        .map_err(|_| CustomError::BadRequestError("Invalid post ID".to_string()))?;

    let count = comment_service.get_comment_count(&post_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment count retrieved successfully",
        "httpStatusCode": 200,
        "count": count
    })))
}

/// Edit a comment's content and image; authorship and parent post are
/// immutable. The image resolves like a post edit: new upload, or null on
/// `remove_photo`, or the existing URL.
/// PUT /comments/{comment_id}
pub async fn update_comment(
    req: HttpRequest,
    payload: Multipart,
    comment_service: web::Data<CommentService>,
    storage: web::Data<StorageService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let user_id_str = get_user_id_from_request(&req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;

    let author_id = ObjectId::parse_str(&user_id_str)
        .map_err(|_| CustomError::BadRequestError("Invalid user ID".to_string()))?;

    let comment_id = ObjectId::parse_str(path.into_inner())
        .map_err(|_| CustomError::BadRequestError("Invalid comment ID".to_string()))?;

    let existing = comment_service
        .get_comment_by_id(&comment_id)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))?;

    if existing.user_id != author_id {
        return Err(CustomError::UnauthorizedError(
            "Only the author can edit this comment".to_string(),
        ));
    }

    let form = parse_form(payload).await?;
    let content = normalize_content(form.text("content"));

    let remove_photo = form.flag("remove_photo");
    let new_upload = match form.file {
        Some(file) => Some(storage.upload_file(file, &FileValidator::images()).await?),
        None => None,
    };
    let image_url = resolve_image_url(new_upload, remove_photo, existing.image_url);

    comment_service
        .update_comment(&comment_id, &author_id, content, image_url)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment updated successfully",
        "httpStatusCode": 200
    })))
}

/// Hard delete of a comment; only runs once the caller has explicitly
/// confirmed
/// DELETE /comments/{comment_id}?confirm=true
pub async fn delete_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    path: web::Path<String>,
    query: web::Query<ConfirmQuery>,
) -> Result<HttpResponse, CustomError> {
    query.ensure_confirmed()?;

    let user_id_str = get_user_id_from_request(&req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;

    let author_id = ObjectId::parse_str(&user_id_str)
        .map_err(|_| CustomError::BadRequestError("Invalid user ID".to_string()))?;

    let comment_id = ObjectId::parse_str(path.into_inner())
        .map_err(|_| CustomError::BadRequestError("Invalid comment ID".to_string()))?;

    comment_service
        .delete_comment(&comment_id, &author_id)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment deleted successfully",
        "httpStatusCode": 200
    })))
}
