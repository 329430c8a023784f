use crate::comment::service::CommentService;
use crate::middleware::auth::get_user_id_from_request;
use crate::post::post_model::{PageQuery, PageWindow, Post, PostWithCount};
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

/// Create a new post from a multipart submission (title, content, optional
/// image file)
/// POST /posts
pub async fn create_post(
    req: HttpRequest,
    payload: Multipart,
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
    let title = form.required_text("title")?.to_string();
    let content = form.required_text("content")?.to_string();

    // The upload must settle before the insert so the record never
    // references an unfinished upload
    let image_url = match form.file {
        Some(file) => Some(storage.upload_file(file, &FileValidator::images()).await?),
        None => None,
    };

    let now = chrono::Utc::now();
    let new_post = Post {
        id: ObjectId::new(),
        title,
        content,
        user_id: author_id,
        author_name: author.author_name(),
        image_url,
        created_at: now,
        updated_at: now,
    };

    let inserted_post = post_service.create_post(new_post).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Post created successfully",
        "httpStatusCode": 201,
        "post": inserted_post
    })))
}

/// One page of posts, newest first, each annotated with its comment count
/// GET /posts?page=N
pub async fn list_posts(
    query: web::Query<PageQuery>,
    post_service: web::Data<PostService>,
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let window = PageWindow::new(query.page.unwrap_or(0));
    let (posts, total) = post_service.list_posts(window).await?;

    let mut annotated = Vec::with_capacity(posts.len());
    for post in posts {
        let comment_count = comment_service.get_comment_count(&post.id).await?;
        annotated.push(PostWithCount {
            post,
            comment_count,
        });
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Posts fetched successfully",
        "httpStatusCode": 200,
        "posts": annotated,
        "total_count": total,
        "page": window.page,
        "per_page": window.limit(),
        "has_next": window.has_next(total),
        "has_previous": window.has_previous()
    })))
}

/// Fetch one post in full
/// GET /posts/{id}
pub async fn get_post(
    post_id: web::Path<String>,
    post_service: web::Data<PostService>,
    comment_service: web::Data<CommentService>,
) -> Result<HttpResponse, CustomError> {
    let post_id = post_id.into_inner();
    let post = post_service
        .get_post(&post_id)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("Post not found".into()))?;

    let comment_count = comment_service.get_comment_count(&post.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post fetched successfully",
        "httpStatusCode": 200,
        "post": PostWithCount { post, comment_count }
    })))
}

/// Edit a post's title, content and image. The image resolves to the newly
/// uploaded file, or null when `remove_photo` is set, or the existing URL.
/// PUT /posts/{id}
pub async fn update_post(
    req: HttpRequest,
    post_id: web::Path<String>,
    payload: Multipart,
    post_service: web::Data<PostService>,
    storage: web::Data<StorageService>,
) -> Result<HttpResponse, CustomError> {
    let user_id_str = get_user_id_from_request(&req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;

    let author_id = ObjectId::parse_str(&user_id_str)
        .map_err(|_| CustomError::BadRequestError("Invalid user ID".to_string()))?;

    let post_id = post_id.into_inner();
    let existing = post_service
        .get_post(&post_id)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("Post not found".into()))?;

    if existing.user_id != author_id {
        return Err(CustomError::UnauthorizedError(
            "Only the author can edit this post".to_string(),
        ));
    }

    let form = parse_form(payload).await?;
    let title = form.required_text("title")?.to_string();
    let content = form.required_text("content")?.to_string();

    let remove_photo = form.flag("remove_photo");
    let new_upload = match form.file {
        Some(file) => Some(storage.upload_file(file, &FileValidator::images()).await?),
        None => None,
    };
    let image_url = resolve_image_url(new_upload, remove_photo, existing.image_url);

    let updated_post = post_service
        .update_post(&post_id, &author_id, title, content, image_url)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("Post not found or not authorized".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Post updated successfully",
        "httpStatusCode": 200,
        "post": updated_post
    })))
}

/// Hard delete of a post; only runs once the caller has explicitly
/// confirmed
/// DELETE /posts/{id}?confirm=true
pub async fn delete_post(
    req: HttpRequest,
    post_id: web::Path<String>,
    query: web::Query<ConfirmQuery>,
    post_service: web::Data<PostService>,
) -> Result<HttpResponse, CustomError> {
    query.ensure_confirmed()?;

    let user_id_str = get_user_id_from_request(&req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;

    let author_id = ObjectId::parse_str(&user_id_str)
        .map_err(|_| CustomError::BadRequestError("Invalid user ID".to_string()))?;

    let post_id = post_id.into_inner();
    let deleted = post_service.delete_post(&post_id, &author_id).await?;

    if deleted {
        Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Post deleted successfully",
            "httpStatusCode": 200
        })))
    } else {
        Err(CustomError::NotFoundError(
            "Post not found or not authorized".into(),
        ))
    }
}
