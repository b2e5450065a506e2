use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        extractors::AuthUser,
        policy::{is_same_password, is_valid_password, is_valid_username},
        repo_types::Principal,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn rejected(status: StatusCode, msg: &'static str) -> Response {
    (status, msg).into_response()
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Principal>), Response> {
    payload.username = payload.username.trim().to_string();

    if !is_valid_username(&payload.username) {
        warn!(username = %payload.username, "invalid username");
        return Err(rejected(StatusCode::BAD_REQUEST, "Invalid username"));
    }

    let unique = state
        .accounts
        .is_unique_username(&payload.username)
        .await
        .map_err(IntoResponse::into_response)?;
    if !unique {
        warn!(username = %payload.username, "username already registered");
        return Err(rejected(StatusCode::CONFLICT, "Username already taken"));
    }

    if !is_valid_password(&payload.password) {
        return Err(rejected(StatusCode::BAD_REQUEST, "Invalid password"));
    }

    if !is_same_password(&payload.password, &payload.confirm_password) {
        return Err(rejected(StatusCode::BAD_REQUEST, "Passwords do not match"));
    }

    let user = state
        .accounts
        .register(&payload)
        .await
        .map_err(IntoResponse::into_response)?;

    Ok((StatusCode::CREATED, Json(Principal::from(&user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, Response> {
    payload.username = payload.username.trim().to_string();

    let principal = state
        .accounts
        .login(&payload)
        .await
        .map_err(IntoResponse::into_response)?;
    let token = state
        .accounts
        .issue_token(&principal)
        .map_err(IntoResponse::into_response)?;

    Ok(Json(AuthResponse {
        token,
        user: principal,
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<Principal>, Response> {
    let user = state
        .accounts
        .find_by_username(&username)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(Principal::from(&user)))
}
