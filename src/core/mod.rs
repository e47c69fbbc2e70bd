//! Core module - server infrastructure
//!
//! - Authentication and JWT
//! - Configuration
//! - Error responses
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

pub use auth::{Claims, authentication_middleware, decode_jwt, encode_jwt};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
