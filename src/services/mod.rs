//! Services module - HTTP handlers grouped by feature

pub mod auth;
pub mod calendar;
pub mod friends;
pub mod pings;
pub mod user;

pub use auth::{login_user, me, register_user};
pub use friends::{
    approve_friend, decline_friend, list_friends, list_incoming_requests, remove_friend,
    request_friend,
};
pub use pings::{create_ping, export_ping_calendar, get_ping, list_inbox, respond_to_ping};
pub use user::{get_user_by_id, search_users};

use axum::{http::StatusCode, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
