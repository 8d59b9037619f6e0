/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use contactbook_api::{app::AppState, config::Config};
/// use contactbook_shared::db::pool::create_pool;
/// use contactbook_shared::repository::Repositories;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// let pool = create_pool(&config.database).await?;
/// let state = AppState::new(Repositories::postgres(pool), config);
/// let app = contactbook_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, MethodRouter},
    Router,
};
use contactbook_shared::{
    auth::authenticator::TokenAuthenticator,
    repository::{Repositories, UserRepository},
    usecase::{AddressUseCase, ContactUseCase, UserUseCase},
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every member is behind an `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserUseCase>,
    pub contacts: Arc<ContactUseCase>,
    pub addresses: Arc<AddressUseCase>,

    /// Token verification for the auth layer
    pub authenticator: Arc<TokenAuthenticator>,

    /// Store handle for health checks
    pub store: Arc<dyn UserRepository>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the use cases over `repos`
    pub fn new(repos: Repositories, config: Config) -> Self {
        let authenticator = TokenAuthenticator::new(repos.users.clone());

        Self {
            users: Arc::new(UserUseCase::new(
                repos.users.clone(),
                authenticator.clone(),
                config.password_params(),
            )),
            contacts: Arc::new(ContactUseCase::new(repos.contacts.clone())),
            addresses: Arc::new(AddressUseCase::new(repos.contacts, repos.addresses)),
            authenticator: Arc::new(authenticator),
            store: repos.users,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                     # Health check (public)
/// └── {prefix}/                                   # default /api
///     ├── POST   /users                           # Register (public)
///     ├── POST   /users/_login                    # Login (public)
///     ├── POST   /users/refresh-token             # Refresh (public)
///     ├── DELETE /users                           # Logout
///     ├── GET    /users/_current                  # Current profile
///     ├── PATCH  /users/_current                  # Update profile
///     ├── GET    /contacts                        # Search
///     ├── POST   /contacts                        # Create
///     ├── GET|PUT|DELETE /contacts/:contact_id
///     ├── GET|POST       /contacts/:contact_id/addresses
///     └── GET|PUT|DELETE /contacts/:contact_id/addresses/:address_id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Token authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Session check runs only for matched methods, so a wrong method on a
    // protected path is still 405 and an unknown path is still 404.
    let auth = axum::middleware::from_fn_with_state(state.clone(), token_auth_layer);
    let protected =
        |method_router: MethodRouter<AppState>| method_router.route_layer(auth.clone());

    let api_routes = Router::new()
        .route(
            "/users",
            post(routes::users::register).merge(protected(delete(routes::users::logout))),
        )
        .route("/users/_login", post(routes::users::login))
        .route("/users/refresh-token", post(routes::users::refresh_token))
        .route(
            "/users/_current",
            protected(get(routes::users::current).patch(routes::users::update)),
        )
        .route(
            "/contacts",
            protected(get(routes::contacts::search).post(routes::contacts::create)),
        )
        .route(
            "/contacts/:contact_id",
            protected(
                get(routes::contacts::get)
                    .put(routes::contacts::update)
                    .delete(routes::contacts::delete),
            ),
        )
        .route(
            "/contacts/:contact_id/addresses",
            protected(get(routes::addresses::list).post(routes::addresses::create)),
        )
        .route(
            "/contacts/:contact_id/addresses/:address_id",
            protected(
                get(routes::addresses::get)
                    .put(routes::addresses::update)
                    .delete(routes::addresses::delete),
            ),
        );

    let prefix = state.config.route_prefix();
    let router = if prefix.is_empty() {
        Router::new().merge(health_routes).merge(api_routes)
    } else {
        Router::new().merge(health_routes).nest(prefix, api_routes)
    };

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.web.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .web
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Token authentication middleware layer
///
/// Reads the raw token from the Authorization header (a leading `Bearer `
/// is accepted), verifies it, then injects `AuthContext` into request
/// extensions. Any failure short-circuits with 401.
async fn token_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            let v = v.trim();
            v.strip_prefix("Bearer ").unwrap_or(v).to_string()
        })
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let auth_context = state.authenticator.authenticate(&token).await?;
    debug!(user_id = %auth_context.user_id, "Request authenticated");

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
