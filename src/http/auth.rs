//! Caller identity extraction.
//!
//! Authentication happens upstream (gateway); this layer trusts the
//! `x-user-id` and `x-user-role` headers it forwards and turns them into
//! an [`Actor`] for the service layer.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::AppError;
use crate::api::UserId;
use crate::models::{Actor, Role};

/// Extractor producing the authenticated [`Actor`] from request headers.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub Actor);

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", name)))?
        .to_str()
        .map_err(|_| AppError::Unauthorized(format!("Invalid {} header", name)))
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id: UserId = header_value(parts, USER_ID_HEADER)?
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid x-user-id header".to_string()))?;
        let role: Role = header_value(parts, USER_ROLE_HEADER)?
            .parse()
            .map_err(|e: String| AppError::Unauthorized(e))?;
        Ok(CallerIdentity(Actor::new(user_id, role)))
    }
}
