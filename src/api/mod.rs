use std::sync::Arc;

use chrono::FixedOffset;
use poem::{
    Endpoint, EndpointExt, Route,
    middleware::{Cors, Tracing},
};
use poem_openapi::{
    OpenApi, OpenApiService,
    param::{Path, Query},
    payload::Json,
};

use crate::pagination::PageParams;
use crate::store::PostStore;

mod handlers;
mod models;
mod responses;

use models::{CreatePost, DateRange, UpdatePost};
use responses::{CreatedResponse, DeletedResponse, PageResponse, PostResponse, respond};

/// Shared by every request. Nothing in here is mutated after startup.
pub struct AppState {
    pub store: PostStore,
    /// Offset that server-assigned timestamps are expressed in.
    pub utc_offset: FixedOffset,
}

struct Api {
    state: Arc<AppState>,
}

#[OpenApi]
impl Api {
    /// List published posts, optionally filtered by a title substring.
    #[oai(path = "/posts", method = "get")]
    async fn list_posts(
        &self,
        Query(page): Query<Option<String>>,
        Query(limit): Query<Option<String>>,
        Query(title): Query<Option<String>>,
    ) -> PageResponse {
        let params = PageParams::parse(page.as_deref(), limit.as_deref());
        let title = title.unwrap_or_default();
        respond(self.published_page(params, &title).await, PageResponse::Ok)
    }

    /// List posts created on one calendar day (`createdAt=YYYY-MM-DD`).
    #[oai(path = "/posts/date", method = "get")]
    async fn list_posts_by_date(
        &self,
        Query(page): Query<Option<String>>,
        Query(limit): Query<Option<String>>,
        Query(title): Query<Option<String>>,
        #[oai(name = "createdAt")] Query(created_at): Query<Option<String>>,
    ) -> PageResponse {
        let params = PageParams::parse(page.as_deref(), limit.as_deref());
        let title = title.unwrap_or_default();
        let created_at = created_at.unwrap_or_default();
        respond(
            self.page_created_on(params, &title, &created_at).await,
            PageResponse::Ok,
        )
    }

    /// Fetch one post and count the view if it is published.
    #[oai(path = "/posts/:id", method = "get")]
    async fn get_post(&self, Path(id): Path<String>) -> PostResponse {
        respond(self.viewed_post(&id).await, PostResponse::Ok)
    }

    /// Create an unpublished post.
    #[oai(path = "/posts", method = "post")]
    async fn create_post(&self, Json(input): Json<CreatePost>) -> CreatedResponse {
        respond(self.created_post(input).await, CreatedResponse::Created)
    }

    /// List posts created within an inclusive date range.
    #[oai(path = "/posts/dateRange", method = "post")]
    async fn list_posts_by_date_range(
        &self,
        Query(page): Query<Option<String>>,
        Query(limit): Query<Option<String>>,
        Json(range): Json<DateRange>,
    ) -> PageResponse {
        let params = PageParams::parse(page.as_deref(), limit.as_deref());
        respond(
            self.page_created_between(params, range).await,
            PageResponse::Ok,
        )
    }

    /// Replace a post's fields, keeping stored values for omitted text fields.
    #[oai(path = "/posts/:id", method = "put")]
    async fn update_post(
        &self,
        Path(id): Path<String>,
        Json(input): Json<UpdatePost>,
    ) -> PostResponse {
        respond(self.updated_post(id, input).await, PostResponse::Ok)
    }

    /// Permanently remove a post.
    #[oai(path = "/posts/:id", method = "delete")]
    async fn delete_post(&self, Path(id): Path<String>) -> DeletedResponse {
        respond(self.deleted_post(&id).await, DeletedResponse::Ok)
    }
}

/// The full HTTP surface: the posts API at the root, its OpenAPI document at
/// `/openapi.json` and Swagger UI under `/docs`.
pub fn app(state: AppState, server_url: &str) -> impl Endpoint + use<> {
    let api = OpenApiService::new(
        Api {
            state: Arc::new(state),
        },
        "Posts API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url);
    let ui = api.swagger_ui();
    let document = api.spec_endpoint();

    Route::new()
        .nest("/docs", ui)
        .at("/openapi.json", document)
        .nest("/", api)
        .with(Cors::new())
        .with(Tracing)
}
