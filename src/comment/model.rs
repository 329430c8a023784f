use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub post_id: ObjectId,
    pub user_id: ObjectId,
    /// Display-name snapshot taken at creation; never re-resolved
    pub author_name: String,
    /// A comment may carry only an image; blank text is stored as null, not
    /// as an empty string
    pub content: Option<String>,
    pub image_url: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Collapse a submitted comment body to its stored form: trimmed-empty or
/// missing text becomes null
pub fn normalize_content(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_kept_as_is() {
        assert_eq!(
            normalize_content(Some("nice story")),
            Some("nice story".to_string())
        );
    }

    #[test]
    fn blank_text_becomes_null() {
        assert_eq!(normalize_content(Some("")), None);
        assert_eq!(normalize_content(Some("   \n")), None);
        assert_eq!(normalize_content(None), None);
    }
}
