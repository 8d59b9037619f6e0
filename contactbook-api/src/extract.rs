/// Request extractors that reject through [`ApiError`]
///
/// Axum's stock `Json`, `Query` and `Path` reject with their own plain-text
/// bodies. These wrappers route the rejection through `ApiError` so bad
/// input gets the standard envelope: 400 for bodies and query strings, 404
/// for path ids that do not parse.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON body extractor
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
