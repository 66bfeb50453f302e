use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::Error;
use crate::utils::token::decode_access_token;
use crate::AppState;

/// Resolves the bearer token to an active [`Account`](crate::models::account::Account)
/// and stores it in the request extensions.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("Not authenticated");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("Malformed authorization header");
    };
    let Some(token) = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
    else {
        return unauthorized("Unsupported authorization scheme");
    };

    let claims = match decode_access_token(state.auth_service.jwt_secret(), token.trim()) {
        Ok(claims) => claims,
        Err(_) => return unauthorized("Could not validate credentials"),
    };

    let account = match state.auth_service.find_by_id(claims.uid).await {
        Ok(Some(account)) if account.email == claims.sub => account,
        Ok(_) => return unauthorized("Could not validate credentials"),
        Err(err) => return err.into_response(),
    };
    if let Err(err) = account.require_active() {
        return err.into_response();
    }

    req.extensions_mut().insert(account);
    next.run(req).await
}

fn unauthorized(detail: &str) -> Response {
    let mut resp = Error::Unauthorized(detail.to_string()).into_response();
    resp.headers_mut().insert(
        axum::http::header::WWW_AUTHENTICATE,
        axum::http::HeaderValue::from_static("Bearer"),
    );
    resp
}
