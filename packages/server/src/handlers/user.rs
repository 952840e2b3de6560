use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use lifecycle::model::Principal;
use lifecycle::{LifecycleError, Unavailable};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{LoginRequest, LoginResponse, SignUpRequest, validate_login_request};
use crate::models::shared::MessageResponse;
use crate::models::user::{MyHackathonsResponse, ProfileResponse, UpdateProfileRequest};
use crate::state::AppState;
use crate::utils::{hash, jwt};

/// Password hashing for the engine's account operations.
pub(crate) fn hash_for_store(password: &str) -> Result<String, LifecycleError> {
    hash::hash_password(password).map_err(|e| {
        LifecycleError::Unavailable(Unavailable::Storage(format!("Password hash error: {e}")))
    })
}

#[utoipa::path(
    post,
    path = "/users/signup",
    tag = "Users",
    operation_id = "signUp",
    summary = "Create an account",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = ProfileResponse),
        (status = 400, description = "Invalid payload (VALIDATION_ERROR) or taken username/email (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn sign_up(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.engine.sign_up(payload.into(), hash_for_store).await?;
    Ok((StatusCode::CREATED, Json(ProfileResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    operation_id = "login",
    summary = "Exchange credentials for a bearer token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Empty username or password (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong password (INVALID_CREDENTIALS)", body = ErrorBody),
        (status = 404, description = "Unknown user (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let user = state.engine.account(payload.username.trim()).await?;

    let is_valid = hash::verify_password(&payload.password, &user.hashed_password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;
    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let auth = &state.config.auth;
    let token = jwt::sign(&Principal::from(&user), &auth.jwt_secret, auth.token_ttl_hours)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/users/admin",
    tag = "Users",
    operation_id = "createAdmin",
    summary = "Create an admin account",
    description = "Same payload as signup. Only admins may call this.",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Admin created", body = ProfileResponse),
        (status = 400, description = "Invalid payload (VALIDATION_ERROR, CONFLICT)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not an admin (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %payload.username))]
pub async fn create_admin(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .engine
        .create_admin(&auth_user, payload.into(), hash_for_store)
        .await?;
    Ok((StatusCode::CREATED, Json(ProfileResponse::from(user))))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    operation_id = "viewProfile",
    summary = "Get the caller's profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Account deleted (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn view_profile(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state.engine.view_profile(&auth_user).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    patch,
    path = "/users",
    tag = "Users",
    operation_id = "updateProfile",
    summary = "Update the caller's profile",
    description = "Only fields that are present and non-empty are changed.",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid e-mail (VALIDATION_ERROR) or e-mail taken (CONFLICT)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Account deleted (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.id))]
pub async fn update_profile(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state.engine.update_profile(&auth_user, payload.into()).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/users",
    tag = "Users",
    operation_id = "deleteProfile",
    summary = "Delete the caller's account",
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Already deleted (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn delete_profile(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.engine.delete_profile(&auth_user).await?;
    Ok(Json(MessageResponse::new("Profile deleted")))
}

#[utoipa::path(
    get,
    path = "/users/hackathons",
    tag = "Users",
    operation_id = "myHackathons",
    summary = "Hackathons the caller takes part in",
    responses(
        (status = 200, description = "Grouped by phase", body = MyHackathonsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn my_hackathons(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MyHackathonsResponse>, AppError> {
    let mine = state.engine.my_hackathons(&auth_user).await?;
    Ok(Json(mine.into()))
}
