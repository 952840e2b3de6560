use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use lifecycle::catalogue::HackathonSummary;
use lifecycle::phase;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::hackathon::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/hackathons",
    tag = "Hackathons",
    operation_id = "listHackathons",
    summary = "List approved hackathons",
    description = "Public. Latest start first, with participant counts.",
    responses(
        (status = 200, description = "Approved hackathons", body = HackathonListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_hackathons(
    State(state): State<AppState>,
) -> Result<Json<HackathonListResponse>, AppError> {
    let list = state.engine.list_public().await?;
    Ok(Json(list.into()))
}

#[utoipa::path(
    post,
    path = "/hackathons",
    tag = "Hackathons",
    operation_id = "createHackathon",
    summary = "Create a hackathon",
    description = "The caller becomes the organiser. Hackathons created by admins are approved right away; all others wait for review.",
    request_body = CreateHackathonRequest,
    responses(
        (status = 201, description = "Hackathon created", body = HackathonResponse),
        (status = 400, description = "Invalid fields or timeline (VALIDATION_ERROR), title taken (CONFLICT)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_hackathon(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateHackathonRequest>,
) -> Result<impl IntoResponse, AppError> {
    let hackathon = state
        .engine
        .create_hackathon(&auth_user, payload.into())
        .await?;
    let phase = phase::evaluate(&hackathon, state.engine.now());
    let summary = HackathonSummary::new(hackathon, phase, 0);

    Ok((StatusCode::CREATED, Json(HackathonResponse::from(summary))))
}

#[utoipa::path(
    get,
    path = "/hackathons/organise",
    tag = "Hackathons",
    operation_id = "listOrganisedHackathons",
    summary = "Hackathons organised by the caller",
    description = "Includes hackathons still waiting for approval.",
    responses(
        (status = 200, description = "Organised hackathons", body = HackathonListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn list_organised(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<HackathonListResponse>, AppError> {
    let list = state.engine.list_organised(&auth_user).await?;
    Ok(Json(list.into()))
}

#[utoipa::path(
    get,
    path = "/hackathons/unapproved",
    tag = "Approval",
    operation_id = "listUnapprovedHackathons",
    summary = "Hackathons waiting for review",
    responses(
        (status = 200, description = "Unapproved hackathons", body = HackathonListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not an admin (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn list_unapproved(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<HackathonListResponse>, AppError> {
    let list = state.engine.list_unapproved(&auth_user).await?;
    Ok(Json(list.into()))
}

#[utoipa::path(
    get,
    path = "/hackathons/{id}",
    tag = "Hackathons",
    operation_id = "getHackathon",
    summary = "Hackathon details",
    params(("id" = i32, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "Hackathon details", body = HackathonResponse),
        (status = 404, description = "Missing or not approved (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_hackathon(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<HackathonResponse>, AppError> {
    let summary = state.engine.details(id).await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/hackathons/{id}/leaderboard",
    tag = "Hackathons",
    operation_id = "getLeaderboard",
    summary = "Ranking of a hackathon",
    description = "Public. Until the result time has passed the list is empty and a placeholder message is returned.",
    params(("id" = i32, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "Leaderboard", body = LeaderboardResponse),
        (status = 404, description = "Hackathon not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let board = state.engine.leaderboard(id).await?;
    Ok(Json(board.into()))
}

#[utoipa::path(
    patch,
    path = "/hackathons/{id}/approve/{value}",
    tag = "Approval",
    operation_id = "reviewHackathon",
    summary = "Approve or disapprove a hackathon",
    description = "`1` approves and mails the organiser. `0` deletes the hackathon with its participants and mails the organiser. The value is only checked once the caller is known to be an admin.",
    params(
        ("id" = i32, Path, description = "Hackathon ID"),
        ("value" = String, Path, description = "`1` to approve, `0` to disapprove"),
    ),
    responses(
        (status = 200, description = "Decision applied", body = ApprovalResponse),
        (status = 400, description = "Value is not 1 or 0 (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not an admin (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Hackathon not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Decision saved, mail failed (NOTIFICATION_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(admin = %auth_user.username))]
pub async fn review_hackathon(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    Path((id, value)): Path<(i32, String)>,
) -> Result<Json<ApprovalResponse>, AppError> {
    let outcome = state.engine.review_value(&auth_user, id, &value).await?;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    post,
    path = "/hackathons/{id}/participate",
    tag = "Participation",
    operation_id = "participate",
    summary = "Join a hackathon",
    description = "Open from approval until the hackathon ends. Organisers cannot join their own hackathon. A confirmation mail is sent to the entrant.",
    params(("id" = i32, Path, description = "Hackathon ID")),
    responses(
        (status = 201, description = "Joined", body = ParticipationResponse),
        (status = 400, description = "Already participating (CONFLICT)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller organises the hackathon (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND) or hackathon not open (PHASE_CLOSED)", body = ErrorBody),
        (status = 502, description = "Joined, confirmation mail failed (NOTIFICATION_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn participate(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.engine.participate(&auth_user, id).await?;
    Ok((StatusCode::CREATED, Json(ParticipationResponse::from(entry))))
}

#[utoipa::path(
    patch,
    path = "/hackathons/{id}/submit",
    tag = "Participation",
    operation_id = "submitWork",
    summary = "Hand in demo and code URLs",
    description = "Participants only, while the hackathon is running. Both URLs are overwritten.",
    params(("id" = i32, Path, description = "Hackathon ID")),
    request_body = SubmitWorkRequest,
    responses(
        (status = 200, description = "Submission stored", body = ParticipationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a participant (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND) or hackathon not running (PHASE_CLOSED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.id))]
pub async fn submit_work(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<SubmitWorkRequest>,
) -> Result<Json<ParticipationResponse>, AppError> {
    let entry = state
        .engine
        .submit_work(&auth_user, id, payload.into())
        .await?;
    Ok(Json(entry.into()))
}
