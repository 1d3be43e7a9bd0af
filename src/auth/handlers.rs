// HTTP handlers for authentication endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    Json,
};
use validator::Validate;

use crate::app::AppState;
use crate::auth::{
    error::AuthError,
    middleware::{AuthenticatedUser, RefreshingUser},
    models::{AccessToken, LoginRequest, RegisterRequest, TokenPair},
    responder,
};

/// Turn the raw JSON extraction result into a validated request
fn decode<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AuthError> {
    let Json(request) = payload.map_err(|rejection| AuthError::BadRequest(rejection.body_text()))?;
    request.validate()?;
    Ok(request)
}

/// Register a new account
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = TokenPair),
        (status = 400, description = "Malformed request"),
        (status = 405, description = "Account already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let request = match decode(payload) {
        Ok(request) => request,
        Err(err) => return responder::failure(&state.messages, &err),
    };

    match state.auth.register(request).await {
        Ok(tokens) => responder::success(StatusCode::CREATED, &state.messages.account_created, &tokens),
        Err(err) => responder::failure(&state.messages, &err),
    }
}

/// Log in with email and password
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = AccessToken),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    user: Result<AuthenticatedUser, AuthError>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let user = match user {
        Ok(user) => user,
        Err(err) => return responder::failure(&state.messages, &err),
    };
    let request = match decode(payload) {
        Ok(request) => request,
        Err(err) => return responder::failure(&state.messages, &err),
    };

    match state.auth.login(request, user.user_id).await {
        Ok(token) => responder::success(StatusCode::OK, &state.messages.login_ok, &token),
        Err(err) => responder::failure(&state.messages, &err),
    }
}

/// Rotate the session's refresh token
/// POST /api/auth/refresh
///
/// The bearer must be the session's current refresh token.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Session refreshed", body = TokenPair),
        (status = 401, description = "Missing, expired or rotated-out refresh token"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    user: Result<RefreshingUser, AuthError>,
) -> Response {
    let user = match user {
        Ok(user) => user,
        Err(err) => return responder::failure(&state.messages, &err),
    };

    match state.auth.refresh_session(user.user_id).await {
        Ok(tokens) => {
            responder::success(StatusCode::OK, &state.messages.session_refreshed, &tokens)
        }
        Err(err) => responder::failure(&state.messages, &err),
    }
}
