use crate::auth::models::AuthenticatedPrincipal;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use facemark_core::AppError;
use facemark_services::audit;
use std::sync::Arc;

fn reject(message: &str) -> Response {
    audit::log_authentication_attempt(None, Some(message.to_string()));
    HttpAppError(AppError::Unauthenticated(message.to_string())).into_response()
}

/// Resolve the bearer credential to a principal before any protected handler runs.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => return reject("Missing authorization header"),
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return reject("Invalid authorization header format");
    };

    match state.authenticator.authenticate(token.trim()).await {
        Ok(principal) => {
            audit::log_authentication_attempt(Some(principal), None);
            request
                .extensions_mut()
                .insert(AuthenticatedPrincipal(principal));
            next.run(request).await
        }
        Err(err) => {
            audit::log_authentication_attempt(None, Some(err.to_string()));
            HttpAppError(err).into_response()
        }
    }
}
