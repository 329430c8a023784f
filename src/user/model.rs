use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The name stamped onto posts and comments at submission time: the
    /// display name if one is set, else the account email. Records keep
    /// whatever this returned when they were written; a later rename never
    /// rewrites them.
    pub fn author_name(&self) -> String {
        self.display_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| self.email.clone())
    }
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
}

/// What `/auth/user/me` returns; never the raw `User` (password hash)
#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: Option<&str>) -> User {
        User {
            id: Some(ObjectId::new()),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hash".to_string(),
            display_name: display_name.map(|n| n.to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn author_name_prefers_display_name() {
        assert_eq!(user(Some("Alice")).author_name(), "Alice");
    }

    #[test]
    fn author_name_falls_back_to_email() {
        assert_eq!(user(None).author_name(), "alice@example.com");
        assert_eq!(user(Some("   ")).author_name(), "alice@example.com");
    }
}
