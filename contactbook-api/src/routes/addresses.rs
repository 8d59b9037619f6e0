/// Address endpoints, nested under a contact
///
/// - `GET    /contacts/:contact_id/addresses` - List (unpaged)
/// - `POST   /contacts/:contact_id/addresses` - Create
/// - `GET    /contacts/:contact_id/addresses/:address_id` - Get
/// - `PUT    /contacts/:contact_id/addresses/:address_id` - Partial update
/// - `DELETE /contacts/:contact_id/addresses/:address_id` - Delete

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    response::WebResponse,
};
use axum::{extract::State, Extension};
use contactbook_shared::{
    auth::authenticator::AuthContext,
    usecase::address::{AddressResponse, CreateAddressRequest, UpdateAddressRequest},
};
use uuid::Uuid;

pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(contact_id): ApiPath<Uuid>,
) -> ApiResult<WebResponse<Vec<AddressResponse>>> {
    let addresses = state.addresses.list(&auth, contact_id).await?;
    Ok(WebResponse::data(addresses))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(contact_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateAddressRequest>,
) -> ApiResult<WebResponse<AddressResponse>> {
    let address = state.addresses.create(&auth, contact_id, req).await?;
    Ok(WebResponse::data(address))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath((contact_id, address_id)): ApiPath<(Uuid, Uuid)>,
) -> ApiResult<WebResponse<AddressResponse>> {
    let address = state.addresses.get(&auth, contact_id, address_id).await?;
    Ok(WebResponse::data(address))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath((contact_id, address_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(req): ApiJson<UpdateAddressRequest>,
) -> ApiResult<WebResponse<AddressResponse>> {
    let address = state
        .addresses
        .update(&auth, contact_id, address_id, req)
        .await?;
    Ok(WebResponse::data(address))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath((contact_id, address_id)): ApiPath<(Uuid, Uuid)>,
) -> ApiResult<WebResponse<bool>> {
    let done = state
        .addresses
        .delete(&auth, contact_id, address_id)
        .await?;
    Ok(WebResponse::data(done))
}
