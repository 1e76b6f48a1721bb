//! HTTP server module.
//!
//! Exposes the governance engine as a REST API on axum, reusing the
//! service layer and repository pattern from the core library. Caller
//! identity arrives via the `x-user-id` / `x-user-role` headers set by
//! the upstream gateway.

#[cfg(feature = "http-server")]
pub mod auth;

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
