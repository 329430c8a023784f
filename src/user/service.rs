use crate::database::DB_NAME;
use crate::middleware::auth::create_token;
use crate::user::model::{CreateUserRequest, User};
use crate::utils::error::CustomError;
use crate::utils::model::LoginRequest;
use crate::utils::{hashing, password_validation};
use chrono::Utc;
use mongodb::bson::{Bson, doc, oid::ObjectId};
use mongodb::{Client, Collection};
use regex::Regex;
use std::sync::LazyLock;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").expect("username regex"));

pub struct UserService {
    collection: Collection<User>,
}

impl UserService {
    pub fn new(client: &Client) -> Self {
        let collection = client.database(DB_NAME).collection::<User>("users");
        UserService { collection }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<ObjectId, CustomError> {
        if !USERNAME_RE.is_match(&request.username) {
            return Err(CustomError::ValidationError(
                "Username must be 3-20 characters of letters, numbers or underscores".to_string(),
            ));
        }

        password_validation::validate_password(&request.password)?;

        if self.email_exists(&request.email).await.map_err(|_| {
            CustomError::InternalServerError("Failed to check email existence".to_string())
        })? {
            return Err(CustomError::ConflictError(
                "Email already exists".to_string(),
            ));
        }

        if self.username_exists(&request.username).await.map_err(|_| {
            CustomError::InternalServerError("Failed to check username existence".to_string())
        })? {
            return Err(CustomError::ConflictError(
                "Username already exists".to_string(),
            ));
        }

        let hashed_password = hashing::hash_password(&request.password)
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?;

        let new_user = User {
            id: None,
            username: request.username,
            email: request.email,
            password: hashed_password,
            display_name: request
                .display_name
                .filter(|name| !name.trim().is_empty()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let result = self
            .collection
            .insert_one(new_user)
            .await
            .map_err(|e| CustomError::InternalServerError(e.to_string()))?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            CustomError::InternalServerError("Failed to get inserted ID".to_string())
        })
    }

    pub async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, CustomError> {
        let user = self
            .collection
            .find_one(doc! { "username": username })
            .await
            .map_err(|_| CustomError::InternalServerError("Database error".to_string()))?
            .ok_or_else(|| CustomError::UnauthorizedError("Invalid credentials".to_string()))?;

        if !hashing::verify_password(password, &user.password)
            .map_err(|_| CustomError::InternalServerError("Invalid credentials".to_string()))?
        {
            return Err(CustomError::UnauthorizedError(
                "Invalid credentials".to_string(),
            ));
        }

        Ok(user)
    }

    pub async fn login(&self, login_data: LoginRequest) -> Result<String, CustomError> {
        let user = self
            .authenticate_user(&login_data.username, &login_data.password)
            .await?;

        let user_id = user
            .id
            .as_ref()
            .ok_or_else(|| CustomError::InternalServerError("User ID missing".to_string()))?;

        create_token(&user_id.to_hex())
    }

    pub async fn get_user_by_id(&self, user_id: &ObjectId) -> Result<Option<User>, CustomError> {
        self.collection
            .find_one(doc! { "_id": user_id })
            .await
            .map_err(|e| CustomError::InternalServerError(format!("Failed to fetch user: {}", e)))
    }

    /// Change the display name used for future posts and comments. Records
    /// already written keep their snapshot; nothing here touches them.
    pub async fn update_display_name(
        &self,
        user_id: &ObjectId,
        display_name: Option<String>,
    ) -> Result<(), CustomError> {
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .map(Bson::String)
            .unwrap_or(Bson::Null);

        let result = self
            .collection
            .update_one(
                doc! { "_id": user_id },
                doc! {
                    "$set": {
                        "display_name": display_name,
                        "updated_at": mongodb::bson::DateTime::from_chrono(Utc::now())
                    }
                },
            )
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to update profile: {}", e))
            })?;

        if result.matched_count == 0 {
            return Err(CustomError::NotFoundError("User not found".to_string()));
        }

        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, mongodb::error::Error> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .await?;
        Ok(count > 0)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, mongodb::error::Error> {
        let count = self
            .collection
            .count_documents(doc! { "username": username })
            .await?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_shape_is_enforced() {
        assert!(USERNAME_RE.is_match("alice_01"));
        assert!(!USERNAME_RE.is_match("al"));
        assert!(!USERNAME_RE.is_match("alice bob"));
        assert!(!USERNAME_RE.is_match("name-with-dashes"));
    }
}
