use crate::middleware::auth::get_user_id_from_request;
use crate::user::model::{CreateUserRequest, UpdateProfileRequest, UserProfile};
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use crate::utils::model::LoginRequest;
use actix_web::{HttpRequest, HttpResponse, web};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

/// Register a new account
/// POST /auth/user/register
pub async fn register_user(
    user_service: web::Data<UserService>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id = user_service.create_user(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "User created successfully",
        "httpStatusCode": 201,
        "user_id": user_id.to_hex()
    })))
}

/// Log in with username and password, returning a bearer token
/// POST /auth/user/login
pub async fn login_user(
    user_service: web::Data<UserService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, CustomError> {
    let token = user_service.login(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Login successful",
        "httpStatusCode": 200,
        "token": token
    })))
}

/// Fetch the authenticated user's profile
/// GET /auth/user/me
pub async fn get_profile(
    req: HttpRequest,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, CustomError> {
    let user_id_str = get_user_id_from_request(&req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;

    let user_id = ObjectId::parse_str(&user_id_str)
        .map_err(|_| CustomError::BadRequestError("Invalid user ID".to_string()))?;

    let user = user_service
        .get_user_by_id(&user_id)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Profile fetched successfully",
        "httpStatusCode": 200,
        "data": UserProfile::from(&user)
    })))
}

/// Update the display name used for future posts and comments; records
/// already written keep their snapshot
/// PUT /auth/user/profile
pub async fn update_profile(
    req: HttpRequest,
    user_service: web::Data<UserService>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id_str = get_user_id_from_request(&req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;

    let user_id = ObjectId::parse_str(&user_id_str)
        .map_err(|_| CustomError::BadRequestError("Invalid user ID".to_string()))?;

    user_service
        .update_display_name(&user_id, body.into_inner().display_name)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "httpStatusCode": 200
    })))
}
