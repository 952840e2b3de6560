use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::hackathon::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/hackathons/{id}/participants",
    tag = "Organiser",
    operation_id = "listParticipants",
    summary = "Entrants of a hackathon",
    params(("id" = i32, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "Entrant profiles", body = EntrantListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not the organiser (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Hackathon not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn list_participants(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EntrantListResponse>, AppError> {
    let entrants = state.engine.view_participants(&auth_user, id).await?;
    Ok(Json(entrants.into()))
}

#[utoipa::path(
    get,
    path = "/hackathons/{id}/submissions",
    tag = "Organiser",
    operation_id = "listSubmissions",
    summary = "Hand-ins of every participant",
    description = "Organiser only, once the hackathon has ended.",
    params(("id" = i32, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "Submissions", body = SubmissionListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not the organiser (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND) or not ended yet (PHASE_CLOSED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn list_submissions(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionListResponse>, AppError> {
    let submissions = state.engine.view_submissions(&auth_user, id).await?;
    Ok(Json(submissions.into()))
}

#[utoipa::path(
    get,
    path = "/hackathons/{id}/users/{username}/submission",
    tag = "Organiser",
    operation_id = "getSubmission",
    summary = "One participant's hand-in",
    params(
        ("id" = i32, Path, description = "Hackathon ID"),
        ("username" = String, Path, description = "Participant username"),
    ),
    responses(
        (status = 200, description = "Submission", body = SubmissionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not the organiser (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown user or non-participant (NOT_FOUND), not ended yet (PHASE_CLOSED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn get_submission(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    Path((id, username)): Path<(i32, String)>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let view = state
        .engine
        .view_submission(&auth_user, id, &username)
        .await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    patch,
    path = "/hackathons/{id}/submissions/{username}/judge",
    tag = "Organiser",
    operation_id = "judgeSubmission",
    summary = "Score a participant",
    description = "Organiser only, once the hackathon has ended.",
    params(
        ("id" = i32, Path, description = "Hackathon ID"),
        ("username" = String, Path, description = "Participant username"),
    ),
    request_body = JudgeRequest,
    responses(
        (status = 200, description = "Score stored", body = ParticipationResponse),
        (status = 400, description = "Negative score (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not the organiser (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND) or not ended yet (PHASE_CLOSED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.id, score = payload.score))]
pub async fn judge_submission(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    Path((id, username)): Path<(i32, String)>,
    AppJson(payload): AppJson<JudgeRequest>,
) -> Result<Json<ParticipationResponse>, AppError> {
    let entry = state
        .engine
        .judge(&auth_user, id, &username, payload.score)
        .await?;
    Ok(Json(entry.into()))
}

#[utoipa::path(
    post,
    path = "/hackathons/{id}/notify",
    tag = "Organiser",
    operation_id = "notifyAll",
    summary = "Mail every participant",
    description = "Organiser only, once the hackathon has ended.",
    params(("id" = i32, Path, description = "Hackathon ID")),
    request_body = NotifyRequest,
    responses(
        (status = 200, description = "Mails sent", body = NotifyResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not the organiser (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND) or not ended yet (PHASE_CLOSED)", body = ErrorBody),
        (status = 502, description = "Delivery stopped at the first failure (NOTIFICATION_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.id))]
pub async fn notify_all(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<NotifyRequest>,
) -> Result<Json<NotifyResponse>, AppError> {
    let message = payload.into_message();
    let notified = state.engine.notify_all(&auth_user, id, &message).await?;
    Ok(Json(NotifyResponse {
        notified,
        message: "Notification sent".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/hackathons/{id}/notify/{username}",
    tag = "Organiser",
    operation_id = "notifyParticipant",
    summary = "Mail one participant",
    params(
        ("id" = i32, Path, description = "Hackathon ID"),
        ("username" = String, Path, description = "Participant username"),
    ),
    request_body = NotifyRequest,
    responses(
        (status = 200, description = "Mail sent", body = NotifyResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not the organiser (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown user or non-participant (NOT_FOUND), not ended yet (PHASE_CLOSED)", body = ErrorBody),
        (status = 502, description = "Delivery failed (NOTIFICATION_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.id))]
pub async fn notify_participant(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    Path((id, username)): Path<(i32, String)>,
    AppJson(payload): AppJson<NotifyRequest>,
) -> Result<Json<NotifyResponse>, AppError> {
    let message = payload.into_message();
    state
        .engine
        .notify_participant(&auth_user, id, &username, &message)
        .await?;
    Ok(Json(NotifyResponse {
        notified: 1,
        message: "Notification sent".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/hackathons/{id}/prize_distribution",
    tag = "Organiser",
    operation_id = "distributePrizes",
    summary = "Mail the top three entrants",
    description = "Organiser only, once results are declared. Winners whose account no longer exists are skipped.",
    params(("id" = i32, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "Winners mailed", body = PrizeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not the organiser (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND) or results not declared (PHASE_CLOSED)", body = ErrorBody),
        (status = 502, description = "Delivery failed (NOTIFICATION_FAILED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.id))]
pub async fn distribute_prizes(
    AuthUser(auth_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PrizeResponse>, AppError> {
    let report = state.engine.distribute_prizes(&auth_user, id).await?;
    Ok(Json(report.into()))
}
