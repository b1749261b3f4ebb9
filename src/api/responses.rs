use poem_openapi::{ApiResponse, payload::Json};

use super::models::{ErrorBody, MessageBody, Post, PostPage};
use crate::error::ApiError;

#[derive(ApiResponse)]
#[oai(bad_request_handler = "bad_request")]
pub enum PageResponse {
    #[oai(status = 200)]
    Ok(Json<PostPage>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),
    #[oai(status = 500)]
    InternalError(Json<ErrorBody>),
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "bad_request")]
pub enum PostResponse {
    #[oai(status = 200)]
    Ok(Json<Post>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),
    #[oai(status = 500)]
    InternalError(Json<ErrorBody>),
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "bad_request")]
pub enum CreatedResponse {
    #[oai(status = 201)]
    Created(Json<Post>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),
    #[oai(status = 500)]
    InternalError(Json<ErrorBody>),
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "bad_request")]
pub enum DeletedResponse {
    #[oai(status = 200)]
    Ok(Json<MessageBody>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorBody>),
    #[oai(status = 404)]
    NotFound(Json<ErrorBody>),
    #[oai(status = 500)]
    InternalError(Json<ErrorBody>),
}

macro_rules! from_api_error {
    ($($response:ident),+ $(,)?) => {
        $(
            impl From<ApiError> for $response {
                fn from(err: ApiError) -> Self {
                    tracing::debug!(status = %err.status_code(), error = %err, "request rejected");
                    match err {
                        ApiError::BadRequest(error) => Self::BadRequest(Json(ErrorBody { error })),
                        ApiError::NotFound(error) => Self::NotFound(Json(ErrorBody { error })),
                        ApiError::Internal(error) => Self::InternalError(Json(ErrorBody { error })),
                    }
                }
            }
        )+
    };
}

from_api_error!(PageResponse, PostResponse, DeletedResponse);

/// Creating never looks a row up, so there is no 404 to report.
impl From<ApiError> for CreatedResponse {
    fn from(err: ApiError) -> Self {
        tracing::debug!(status = %err.status_code(), error = %err, "request rejected");
        match err {
            ApiError::BadRequest(error) => Self::BadRequest(Json(ErrorBody { error })),
            ApiError::NotFound(error) | ApiError::Internal(error) => {
                Self::InternalError(Json(ErrorBody { error }))
            }
        }
    }
}

/// Framework-level parse failures (bad JSON, wrong content type) keep the
/// `{"error": ...}` shape.
fn bad_request<R: From<ApiError>>(err: poem::Error) -> R {
    ApiError::bad_request(err.to_string()).into()
}

/// Maps a handler outcome onto the endpoint's response enum.
pub fn respond<T, R: From<ApiError>>(result: Result<T, ApiError>, ok: impl FnOnce(Json<T>) -> R) -> R {
    match result {
        Ok(value) => ok(Json(value)),
        Err(err) => err.into(),
    }
}
