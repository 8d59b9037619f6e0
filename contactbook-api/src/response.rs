/// Response envelope
///
/// Every body, success or failure, has the same shape; absent members are
/// omitted:
///
/// ```json
/// {
///   "data": [ ... ],
///   "errors": "...",
///   "paging": { "page": 1, "size": 10, "total_item": 25, "total_page": 3 }
/// }
/// ```
///
/// `paging` appears only on contact search.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contactbook_shared::models::paging::PageMetadata;
use serde::{Deserialize, Serialize};

/// Standard response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<PageMetadata>,
}

impl<T> WebResponse<T> {
    /// Successful response carrying `data`
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            errors: None,
            paging: None,
        }
    }

    /// Successful response carrying one page of results
    pub fn paged(data: T, paging: PageMetadata) -> Self {
        Self {
            data: Some(data),
            errors: None,
            paging: Some(paging),
        }
    }

    /// Error response carrying only a message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: Some(message.into()),
            paging: None,
        }
    }
}

impl<T: Serialize> IntoResponse for WebResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
