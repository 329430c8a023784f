use crate::comment::model::Comment;
use crate::database::DB_NAME;
use crate::utils::error::CustomError;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, doc, oid::ObjectId};
use mongodb::{Client, Collection};

pub struct CommentService {
    collection: Collection<Comment>,
}

impl CommentService {
    pub fn new(client: &Client) -> Self {
        let collection = client
            .database(DB_NAME)
            .collection::<Comment>("comments");
        CommentService { collection }
    }

    /// Insert a new comment and return its id
    pub async fn add_comment(&self, comment: Comment) -> Result<ObjectId, CustomError> {
        let result = self.collection.insert_one(comment).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to add comment: {}", e))
        })?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            CustomError::InternalServerError("Failed to get inserted comment ID".to_string())
        })
    }

    /// The full thread for a post, oldest first
    pub async fn get_comments_for_post(
        &self,
        post_id: &ObjectId,
    ) -> Result<Vec<Comment>, CustomError> {
        let cursor = self
            .collection
            .find(doc! { "post_id": post_id })
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch comments: {}", e))
            })?;

        let comments: Vec<Comment> = cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect comments: {}", e))
        })?;

        Ok(comments)
    }

    pub async fn get_comment_by_id(
        &self,
        comment_id: &ObjectId,
    ) -> Result<Option<Comment>, CustomError> {
        self.collection
            .find_one(doc! { "_id": comment_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch comment: {}", e))
            })
    }

    /// Update a comment's content and image; authorship and parent linkage
    /// are immutable. Only the author's own record matches the filter.
    pub async fn update_comment(
        &self,
        comment_id: &ObjectId,
        author_id: &ObjectId,
        content: Option<String>,
        image_url: Option<String>,
    ) -> Result<bool, CustomError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": comment_id, "user_id": author_id },
                doc! {
                    "$set": {
                        "content": content.map(Bson::String).unwrap_or(Bson::Null),
                        "image_url": image_url.map(Bson::String).unwrap_or(Bson::Null),
                        "updated_at": mongodb::bson::DateTime::from_chrono(Utc::now())
                    }
                },
            )
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to update comment: {}", e))
            })?;

        if result.matched_count == 0 {
            return Err(CustomError::NotFoundError(
                "Comment not found or not authorized".to_string(),
            ));
        }

        Ok(result.modified_count > 0)
    }

    /// Hard delete of the author's own comment
    pub async fn delete_comment(
        &self,
        comment_id: &ObjectId,
        author_id: &ObjectId,
    ) -> Result<bool, CustomError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": comment_id, "user_id": author_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to delete comment: {}", e))
            })?;

        if result.deleted_count == 0 {
            return Err(CustomError::NotFoundError(
                "Comment not found or not authorized".to_string(),
            ));
        }

        Ok(true)
    }

    /// Read-time comment count for a post; recomputed on every call
    pub async fn get_comment_count(&self, post_id: &ObjectId) -> Result<u64, CustomError> {
        self.collection
            .count_documents(doc! { "post_id": post_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to count comments: {}", e))
            })
    }
}
