//! What each endpoint does once its inputs are parsed.

use chrono::{NaiveDate, Utc};
use sea_orm::DbErr;
use validator::Validate;

use super::Api;
use super::models::{CreatePost, DateRange, MessageBody, Post, PostPage, UpdatePost};
use crate::error::ApiError;
use crate::pagination::{PageParams, total_pages, total_pages_at_least_one};
use crate::store::PostChanges;

const DATE_FORMAT: &str = "%Y-%m-%d";
const GENERIC_FAILURE: &str = "error message";
const DELETE_FAILURE: &str = "Failed to delete";

fn non_empty_or(value: String, stored: String) -> String {
    if value.is_empty() { stored } else { value }
}

impl Api {
    /// Explicit limit, or the number of published posts when none was given.
    async fn effective_limit(&self, params: PageParams) -> Result<i64, DbErr> {
        match params.limit {
            Some(limit) => Ok(limit),
            None => {
                let published = self.state.store.count_published().await?;
                Ok(i64::try_from(published).unwrap_or(i64::MAX))
            }
        }
    }

    /// Like [`Api::effective_limit`], but a failed count leaves the limit at 0.
    async fn effective_limit_or_zero(&self, params: PageParams) -> i64 {
        self.effective_limit(params).await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "counting published posts failed, limit stays 0");
            0
        })
    }

    pub(super) async fn published_page(
        &self,
        params: PageParams,
        title: &str,
    ) -> Result<PostPage, ApiError> {
        let limit = self.effective_limit_or_zero(params).await;
        let window = params.window(limit).map_err(ApiError::internal)?;
        let store = &self.state.store;

        let rows = store
            .list_published(title, window)
            .await
            .map_err(ApiError::internal)?;
        let total = store
            .count_published_titled(title)
            .await
            .map_err(ApiError::internal)?;

        Ok(PostPage::new(
            rows,
            window.limit,
            params.page,
            total_pages_at_least_one(total, window.limit),
        ))
    }

    /// The rows are not restricted to published posts, the page count is.
    pub(super) async fn page_created_on(
        &self,
        params: PageParams,
        title: &str,
        created_at: &str,
    ) -> Result<PostPage, ApiError> {
        let limit = self.effective_limit_or_zero(params).await;
        let window = params.window(limit).map_err(ApiError::internal)?;
        let store = &self.state.store;

        // `created_at` goes to the store unchecked; its own date conversion decides.
        let rows = store
            .list_created_on(title, created_at, window)
            .await
            .map_err(ApiError::internal)?;
        if rows.is_empty() {
            return Err(ApiError::not_found("The searched post was not found."));
        }

        let total = store
            .count_published_created_on(title, created_at)
            .await
            .map_err(ApiError::internal)?;

        Ok(PostPage::new(
            rows,
            window.limit,
            params.page,
            total_pages(total, window.limit),
        ))
    }

    pub(super) async fn page_created_between(
        &self,
        params: PageParams,
        range: DateRange,
    ) -> Result<PostPage, ApiError> {
        if range.start_date.is_empty() {
            return Err(ApiError::bad_request("start_date is required"));
        }
        if range.end_date.is_empty() {
            return Err(ApiError::bad_request("end_date is required"));
        }
        let start = NaiveDate::parse_from_str(&range.start_date, DATE_FORMAT)
            .map_err(|_| ApiError::bad_request("Invalid start_date format. Use yyyy-mm-dd."))?;
        let end = NaiveDate::parse_from_str(&range.end_date, DATE_FORMAT)
            .map_err(|_| ApiError::bad_request("Invalid end_date format. Use yyyy-mm-dd."))?;

        let limit = self
            .effective_limit(params)
            .await
            .map_err(ApiError::internal)?;
        let window = params.window(limit).map_err(ApiError::internal)?;
        let store = &self.state.store;

        let rows = store
            .list_created_between(start, end, window)
            .await
            .map_err(ApiError::internal)?;
        let total = store
            .count_created_between(start, end)
            .await
            .map_err(ApiError::internal)?;

        Ok(PostPage::new(
            rows,
            window.limit,
            params.page,
            total_pages(total, window.limit),
        ))
    }

    /// Counts the view, then reads the post back. The two statements are
    /// independent, so a post deleted in between still reports 404.
    pub(super) async fn viewed_post(&self, id: &str) -> Result<Post, ApiError> {
        let store = &self.state.store;

        store.increment_views(id).await.map_err(ApiError::internal)?;

        match store.find(id).await {
            Ok(Some(row)) => Ok(Post::from(row)),
            Ok(None) => Err(ApiError::not_found("this id not found.")),
            Err(err) => Err(ApiError::masked(err, GENERIC_FAILURE)),
        }
    }

    pub(super) async fn created_post(&self, input: CreatePost) -> Result<Post, ApiError> {
        input.validate()?;

        let now = Utc::now().with_timezone(&self.state.utc_offset);
        let row = self
            .state
            .store
            .insert(input.title, input.content, now)
            .await
            .map_err(|err| ApiError::masked(err, GENERIC_FAILURE))?;

        tracing::info!(id = %row.id, "post created");
        // The store may hand the timestamp back in UTC.
        let mut post = Post::from(row);
        post.created_at = post.created_at.with_timezone(&self.state.utc_offset);
        Ok(post)
    }

    pub(super) async fn updated_post(&self, id: String, input: UpdatePost) -> Result<Post, ApiError> {
        let store = &self.state.store;

        let existing = store
            .find(&id)
            .await
            .map_err(ApiError::internal)?
            .ok_or_else(|| ApiError::internal(DbErr::RecordNotFound(format!("post {id}"))))?;

        let changes = PostChanges {
            title: non_empty_or(input.title, existing.title),
            content: non_empty_or(input.content, existing.content),
            published: input.published,
            created_at: input.created_at.unwrap_or(existing.created_at),
            updated_at: Utc::now().with_timezone(&self.state.utc_offset),
        };
        store
            .update(&id, changes.clone())
            .await
            .map_err(ApiError::internal)?;

        tracing::info!(%id, published = changes.published, "post updated");
        Ok(Post {
            id,
            title: changes.title,
            content: changes.content,
            published: changes.published,
            created_at: changes.created_at,
        })
    }

    pub(super) async fn deleted_post(&self, id: &str) -> Result<MessageBody, ApiError> {
        let removed = self
            .state
            .store
            .delete(id)
            .await
            .map_err(|err| ApiError::masked(err, DELETE_FAILURE))?;
        if removed == 0 {
            return Err(ApiError::not_found(
                "The post you want to delete was not found.",
            ));
        }

        tracing::info!(%id, "post deleted");
        Ok(MessageBody {
            message: "Successfully deleted.".to_owned(),
        })
    }
}
