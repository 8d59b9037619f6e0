/// Contact endpoints
///
/// All routes require a session token and only ever touch the caller's own
/// contacts. A `contact_id` that is not a UUID is a 404.
///
/// # Endpoints
///
/// - `GET    /contacts?name=&email=&phone=&page=&size=` - Paged search
/// - `POST   /contacts` - Create
/// - `GET    /contacts/:contact_id` - Get
/// - `PUT    /contacts/:contact_id` - Partial update
/// - `DELETE /contacts/:contact_id` - Delete (addresses go with it)

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    response::WebResponse,
};
use axum::{extract::State, Extension};
use contactbook_shared::{
    auth::authenticator::AuthContext,
    usecase::contact::{
        ContactResponse, CreateContactRequest, SearchContactRequest, UpdateContactRequest,
    },
};
use uuid::Uuid;

/// Search handler
///
/// # Response
///
/// ```json
/// {
///   "data": [ { "id": "...", "first_name": "Ann", ... } ],
///   "paging": { "page": 1, "size": 10, "total_item": 25, "total_page": 3 }
/// }
/// ```
pub async fn search(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<SearchContactRequest>,
) -> ApiResult<WebResponse<Vec<ContactResponse>>> {
    let (contacts, paging) = state.contacts.search(&auth, query).await?;
    Ok(WebResponse::paged(contacts, paging))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateContactRequest>,
) -> ApiResult<WebResponse<ContactResponse>> {
    let contact = state.contacts.create(&auth, req).await?;
    Ok(WebResponse::data(contact))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(contact_id): ApiPath<Uuid>,
) -> ApiResult<WebResponse<ContactResponse>> {
    let contact = state.contacts.get(&auth, contact_id).await?;
    Ok(WebResponse::data(contact))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(contact_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateContactRequest>,
) -> ApiResult<WebResponse<ContactResponse>> {
    let contact = state.contacts.update(&auth, contact_id, req).await?;
    Ok(WebResponse::data(contact))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(contact_id): ApiPath<Uuid>,
) -> ApiResult<WebResponse<bool>> {
    let done = state.contacts.delete(&auth, contact_id).await?;
    Ok(WebResponse::data(done))
}
