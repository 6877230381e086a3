use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use eventboard_types::api::Claims;

use crate::auth::AppState;
use crate::error::{AppError, AuthRejection};
use crate::token::TokenService;

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthRejection::NoHeader)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthRejection::NoToken)
}

pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<Claims, AuthRejection> {
    let token = bearer_token(headers)?;
    tokens.verify(token)
}

/// Extract and validate the bearer token, then hand the claims to the
/// handler through request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = authenticate(req.headers(), &state.tokens).map_err(|rejection| {
        warn!("{} {} rejected: {:?}", req.method(), req.uri().path(), rejection);
        rejection
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
