use std::env;

use crate::utils::error::CustomError;
use actix_web::{Error, HttpMessage, dev::ServiceRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub exp: usize,
}

/// Verify the bearer JWT and stash its claims in the request extensions
pub async fn verify_token(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let token = credentials.token();
    let secret = env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string());

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(token_data) => {
            req.extensions_mut().insert(token_data.claims);
            Ok(req)
        }
        Err(_) => Err((actix_web::error::ErrorUnauthorized("Invalid token"), req)),
    }
}

/// Create a JWT for a user, valid for 24 hours
pub fn create_token(user_id: &str) -> Result<String, CustomError> {
    let secret = env::var("JWT_SECRET")
        .map_err(|_| CustomError::UnauthorizedError("JWT_SECRET must be set".to_string()))?;

    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(24))
        .ok_or_else(|| CustomError::InternalServerError("Clock overflow".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        id: user_id.to_owned(),
        exp: expiration,
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| CustomError::BadRequestError("Token generation failed".to_string()))
}

/// Get the authenticated user id from request extensions (requires the
/// bearer middleware to have run)
pub fn get_user_id_from_request(req: &actix_web::HttpRequest) -> Option<String> {
    req.extensions()
        .get::<Claims>()
        .map(|claims| claims.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn user_id_is_read_back_from_extensions() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(get_user_id_from_request(&req), None);

        req.extensions_mut().insert(Claims {
            id: "64f000000000000000000001".to_string(),
            exp: 0,
        });
        assert_eq!(
            get_user_id_from_request(&req).as_deref(),
            Some("64f000000000000000000001")
        );
    }
}
