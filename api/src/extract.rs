//! Request extractors.

use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use rn_core::domain::entities::Principal;
use rn_core::errors::DomainError;

use crate::errors::ApiError;
use crate::state::AppState;

/// Extracts and resolves the bearer token into a live [`Principal`].
///
/// The account is re-read from the repository on every request, so an
/// agent whose approval was revoked loses access on their next call.
pub struct Auth(pub Principal);

fn bearer_token(req: &HttpRequest) -> Result<String, DomainError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| DomainError::unauthenticated("Missing Authorization header"))?;
    header
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DomainError::unauthenticated("Authorization header must be a bearer token"))
}

impl FromRequest for Auth {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| ApiError(DomainError::internal("Application state missing")))?;
            let token = bearer_token(&req)?;
            let principal = state.auth.resolve_token(&token).await?;
            Ok(Auth(principal))
        })
    }
}
