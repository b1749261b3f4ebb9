use chrono::{DateTime, FixedOffset};
use poem_openapi::Object;
use validator::Validate;

use crate::entities::post;

/// A post as returned to clients.
#[derive(Debug, Clone, PartialEq, Object)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<FixedOffset>,
}

impl From<post::Model> for Post {
    fn from(row: post::Model) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            published: row.published,
            created_at: row.created_at,
        }
    }
}

/// One page of posts plus paging metadata.
#[derive(Debug, Clone, PartialEq, Object)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// Number of posts on this page.
    pub count: u64,
    /// Page size actually applied.
    pub limit: u64,
    /// Requested page, echoed as given.
    pub page: i64,
    pub total_page: u64,
}

impl PostPage {
    pub fn new(rows: Vec<post::Model>, limit: u64, page: i64, total_page: u64) -> Self {
        let posts: Vec<Post> = rows.into_iter().map(Post::from).collect();
        Self {
            count: posts.len() as u64,
            posts,
            limit,
            page,
            total_page,
        }
    }
}

/// Any other field in the body is ignored; new posts always start unpublished.
#[derive(Debug, Object, Validate)]
pub struct CreatePost {
    #[oai(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[oai(default)]
    pub content: String,
}

/// Empty strings and a missing `created_at` keep the stored value.
/// `published` is always written; leaving it out unpublishes the post.
#[derive(Debug, Object)]
pub struct UpdatePost {
    #[oai(default)]
    pub title: String,
    #[oai(default)]
    pub content: String,
    #[oai(default)]
    pub published: bool,
    pub created_at: Option<DateTime<FixedOffset>>,
}

/// Inclusive range of creation dates, each `YYYY-MM-DD`.
#[derive(Debug, Object)]
pub struct DateRange {
    #[oai(default)]
    pub start_date: String,
    #[oai(default)]
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Object)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Object)]
pub struct MessageBody {
    pub message: String,
}
