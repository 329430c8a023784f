use super::controller::{get_profile, login_user, register_user, update_profile};
use crate::middleware::auth::verify_token;
use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth/user")
            .route("/register", web::post().to(register_user))
            .route("/login", web::post().to(login_user))
            .service(
                web::scope("")
                    .wrap(HttpAuthentication::bearer(verify_token))
                    .route("/me", web::get().to(get_profile))
                    .route("/profile", web::put().to(update_profile)),
            ),
    );
}
