//! Aura - social meetup pings between friends
//!
//! The crate holds three layers:
//! - [`domain`]: the friendship and invite state machines, the ping aggregate
//!   and its derived values, shared by everything else;
//! - the HTTP server ([`core`], [`entities`], [`dtos`], [`repositories`],
//!   [`services`]) assembled by [`create_router`];
//! - [`client`]: the session-aware client core driving the same API.

pub mod client;
pub mod core;
pub mod domain;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;

pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Builds the application router, with every API route under `/api`
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::core::authentication_middleware;
    use services::*;

    let api = Router::new()
        .nest("/auth", configure_auth_routes())
        .route(
            "/me",
            get(me).layer(middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            )),
        )
        .nest("/users", configure_user_routes(state.clone()))
        .nest("/friends", configure_friend_routes(state.clone()))
        .nest("/pings", configure_ping_routes(state.clone()));

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Registration and login, no token required
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user))
}

fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/search", get(search_users))
        .route("/{user_id}", get(get_user_by_id))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_friend_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(list_friends))
        .route("/requests/incoming", get(list_incoming_requests))
        .route("/{user_id}", delete(remove_friend))
        .route("/{user_id}/request", post(request_friend))
        .route("/{user_id}/approve", post(approve_friend))
        .route("/{user_id}/decline", post(decline_friend))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_ping_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    let member_routes = Router::new()
        .route("/", post(create_ping))
        .route("/inbox", get(list_inbox))
        .route("/{ping_id}", get(get_ping))
        .route("/{ping_id}/respond", post(respond_to_ping))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    // Signed by the per-ping secret instead of a bearer token
    let public_routes = Router::new().route("/{ping_id}/ics-public", get(export_ping_calendar));

    member_routes.merge(public_routes)
}
