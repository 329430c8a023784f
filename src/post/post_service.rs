use crate::database::DB_NAME;
use crate::post::post_model::{PageWindow, Post};
use crate::utils::error::CustomError;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{Bson, doc, oid::ObjectId},
};

pub struct PostService {
    collection: Collection<Post>,
}

impl PostService {
    pub fn new(client: &Client) -> Self {
        let collection = client.database(DB_NAME).collection::<Post>("posts");
        PostService { collection }
    }

    pub async fn create_post(&self, post: Post) -> Result<Post, CustomError> {
        self.collection
            .insert_one(&post)
            .await
            .map_err(|_| CustomError::InternalServerError("Failed to create post".into()))?;

        Ok(post)
    }

    /// One page of posts ordered by creation time descending, plus the exact
    /// total count
    pub async fn list_posts(&self, window: PageWindow) -> Result<(Vec<Post>, u64), CustomError> {
        let total = self
            .collection
            .count_documents(doc! {})
            .await
            .map_err(|_| CustomError::InternalServerError("Failed to count posts".into()))?;

        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .skip(window.skip())
            .limit(window.limit())
            .await
            .map_err(|_| CustomError::InternalServerError("Failed to fetch posts".into()))?;

        let posts: Vec<Post> = cursor
            .try_collect()
            .await
            .map_err(|_| CustomError::InternalServerError("Failed to collect posts".into()))?;

        Ok((posts, total))
    }

    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, CustomError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| CustomError::BadRequestError("Invalid post ID".into()))?;

        self.collection
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|_| CustomError::InternalServerError("Failed to fetch post".into()))
    }

    /// Update title, content and image of a post owned by `author_id`.
    /// `image_url: None` clears the image. `created_at` stays untouched;
    /// only `updated_at` is re-stamped.
    pub async fn update_post(
        &self,
        id: &str,
        author_id: &ObjectId,
        title: String,
        content: String,
        image_url: Option<String>,
    ) -> Result<Option<Post>, CustomError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| CustomError::BadRequestError("Invalid post ID".into()))?;

        let update_doc = doc! {
            "$set": {
                "title": title,
                "content": content,
                "image_url": image_url.map(Bson::String).unwrap_or(Bson::Null),
                "updated_at": mongodb::bson::DateTime::from_chrono(Utc::now())
            }
        };

        let updated_post = self
            .collection
            .find_one_and_update(doc! { "_id": object_id, "user_id": author_id }, update_doc)
            .return_document(mongodb::options::ReturnDocument::After)
            .await
            .map_err(|_| CustomError::InternalServerError("Failed to update post".into()))?;

        Ok(updated_post)
    }

    /// Hard delete of a post owned by `author_id`; returns whether a record
    /// was removed
    pub async fn delete_post(&self, id: &str, author_id: &ObjectId) -> Result<bool, CustomError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| CustomError::BadRequestError("Invalid post ID".into()))?;

        let result = self
            .collection
            .delete_one(doc! { "_id": object_id, "user_id": author_id })
            .await
            .map_err(|_| CustomError::InternalServerError("Failed to delete post".into()))?;

        Ok(result.deleted_count > 0)
    }
}
