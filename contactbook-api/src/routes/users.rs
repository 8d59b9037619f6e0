/// User endpoints
///
/// # Endpoints
///
/// - `POST   /users` - Register (public)
/// - `POST   /users/_login` - Login, returns a token pair (public)
/// - `POST   /users/refresh-token` - Rotate the token pair (public)
/// - `GET    /users/_current` - Current profile
/// - `PATCH  /users/_current` - Update name and/or password
/// - `DELETE /users` - Logout

use crate::{
    app::AppState, error::ApiResult, extract::ApiJson, response::WebResponse,
};
use axum::{extract::State, Extension};
use contactbook_shared::{
    auth::authenticator::AuthContext,
    usecase::user::{
        LoginUserRequest, RefreshTokenRequest, RegisterUserRequest, TokenResponse,
        UpdateUserRequest, UserResponse,
    },
};

/// Register handler
///
/// # Request
///
/// ```json
/// { "id": "jane", "password": "secret", "name": "Jane Doe" }
/// ```
///
/// # Errors
///
/// - 400 if a field is missing or too long
/// - 409 if the id is taken
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterUserRequest>,
) -> ApiResult<WebResponse<UserResponse>> {
    let user = state.users.register(req).await?;
    Ok(WebResponse::data(user))
}

/// Login handler
///
/// Unknown id and wrong password both return 401 with the same message.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginUserRequest>,
) -> ApiResult<WebResponse<TokenResponse>> {
    let tokens = state.users.login(req).await?;
    Ok(WebResponse::data(tokens))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshTokenRequest>,
) -> ApiResult<WebResponse<TokenResponse>> {
    let tokens = state.users.refresh_token(req).await?;
    Ok(WebResponse::data(tokens))
}

pub async fn current(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<WebResponse<UserResponse>> {
    let user = state.users.current(&auth).await?;
    Ok(WebResponse::data(user))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<WebResponse<UserResponse>> {
    let user = state.users.update(&auth, req).await?;
    Ok(WebResponse::data(user))
}

/// Logout handler; the presented token stops working immediately
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<WebResponse<bool>> {
    let done = state.users.logout(&auth).await?;
    Ok(WebResponse::data(done))
}
