use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

/// Fixed page size of the post list
pub const POSTS_PER_PAGE: u64 = 5;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    pub user_id: ObjectId,
    /// Display-name snapshot taken at creation; never re-resolved
    pub author_name: String,
    pub image_url: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// A post annotated with its read-time comment count. The count is derived
/// on every fetch, never stored.
#[derive(Serialize)]
pub struct PostWithCount {
    #[serde(flatten)]
    pub post: Post,
    pub comment_count: u64,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

/// One window of the paginated post list: `[page * size, page * size + size)`
/// over posts ordered by creation time descending.
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    pub page: u64,
}

impl PageWindow {
    pub fn new(page: u64) -> Self {
        PageWindow { page }
    }

    /// Saturating: a page number from the query string may be arbitrarily
    /// large, and an out-of-range window is simply empty
    pub fn skip(&self) -> u64 {
        self.page.saturating_mul(POSTS_PER_PAGE)
    }

    pub fn limit(&self) -> i64 {
        POSTS_PER_PAGE as i64
    }

    /// Whether a further page exists for the given exact total
    pub fn has_next(&self, total: u64) -> bool {
        self.page
            .saturating_add(1)
            .saturating_mul(POSTS_PER_PAGE)
            < total
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_posts_split_into_windows_of_5_5_2() {
        let total = 12u64;

        for (page, expected_len) in [(0u64, 5u64), (1, 5), (2, 2)] {
            let window = PageWindow::new(page);
            assert_eq!(window.skip(), page * 5);
            assert_eq!(window.limit(), 5);
            // what a skip/limit query would return for this window
            let remaining = total - window.skip();
            assert_eq!(remaining.min(POSTS_PER_PAGE), expected_len);
        }
    }

    #[test]
    fn next_is_available_exactly_until_the_last_page() {
        let total = 12u64;
        assert!(PageWindow::new(0).has_next(total));
        assert!(PageWindow::new(1).has_next(total));
        assert!(!PageWindow::new(2).has_next(total));
    }

    #[test]
    fn previous_is_available_exactly_after_page_zero() {
        assert!(!PageWindow::new(0).has_previous());
        assert!(PageWindow::new(1).has_previous());
    }

    #[test]
    fn exact_multiple_of_page_size_has_no_phantom_page() {
        assert!(PageWindow::new(0).has_next(10));
        assert!(!PageWindow::new(1).has_next(10));
    }

    #[test]
    fn absurd_page_numbers_saturate_instead_of_overflowing() {
        let window = PageWindow::new(u64::MAX);
        assert_eq!(window.skip(), u64::MAX);
        assert!(!window.has_next(12));
        assert!(window.has_previous());
    }

    #[test]
    fn empty_list_has_neither_direction() {
        assert!(!PageWindow::new(0).has_next(0));
        assert!(!PageWindow::new(0).has_previous());
    }
}
