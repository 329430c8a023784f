use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use dotenv::dotenv;
use env_logger::Env;
use log::info;

mod comment;
mod database;
mod middleware;
mod post;
mod router;
mod uploader;
mod user;
mod utils;

use comment::service::CommentService;
use middleware::error_handler::handle_error;
use middleware::not_found::not_found;
use post::post_service::PostService;
use router::index::routes;
use serde_json::json;
use user::service::UserService;
use utils::uploads::StorageService;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the Storyline API",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string()),
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mongo_client = database::connect_to_mongo()
        .await
        .expect("Failed to connect to MongoDB");

    let post_service = web::Data::new(PostService::new(&mongo_client));
    let comment_service = web::Data::new(CommentService::new(&mongo_client));
    let user_service = web::Data::new(UserService::new(&mongo_client));
    let storage_service =
        web::Data::new(StorageService::new().expect("Storage configuration missing"));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    info!("Starting server on http://localhost:{}", port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(post_service.clone())
            .app_data(comment_service.clone())
            .app_data(user_service.clone())
            .app_data(storage_service.clone())
            .configure(routes)
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::NOT_FOUND, not_found)
                    .default_handler(handle_error),
            )
            .service(default)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
