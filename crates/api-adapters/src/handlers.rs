//! # api-adapters Handlers
//!
//! Thin JSON handlers over the service layer. Identities arrive in the
//! `x-user-id` header (session issuance belongs to an external
//! collaborator); every id in a path is a structured route parameter,
//! never a sliced path segment.

use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use domains::error::AppError;
use domains::models::{
    Circle, Comment, MembershipStatus, Notification, Page, Thread, ThreadContent, ThreadKind,
    ThreadSort, User,
};
use domains::reactions::{ReactionKind, ReactionUpdate};
use domains::validation;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// The acting identity, taken from the `x-user-id` header.
pub struct ActorId(pub Uuid);

impl<S> FromRequestParts<S> for ActorId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Validation("missing x-user-id header".into()))?;
        let id = raw
            .parse::<Uuid>()
            .map_err(|_| AppError::Validation("x-user-id is not a valid UUID".into()))?;
        Ok(ActorId(id))
    }
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    validation::username(&req.username)?;
    let user = User::new(req.username);
    state.users.insert(user.clone()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = state
        .users
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(user))
}

#[derive(Deserialize)]
pub struct CreateCircleRequest {
    pub name: String,
}

pub async fn create_circle(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Json(req): Json<CreateCircleRequest>,
) -> ApiResult<(StatusCode, Json<Circle>)> {
    let circle = state.membership.create_circle(actor, &req.name).await?;
    Ok((StatusCode::CREATED, Json(circle)))
}

pub async fn get_circle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Circle>> {
    Ok(Json(state.membership.get_circle(id).await?))
}

pub async fn delete_circle(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.membership.delete_circle(id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn join_circle(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Circle>> {
    Ok(Json(state.membership.join(id, actor).await?))
}

pub async fn leave_circle(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.membership.leave(id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn membership_status(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MembershipStatus>> {
    Ok(Json(state.membership.membership_status(id, actor).await?))
}

pub async fn create_thread(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path(circle_id): Path<Uuid>,
    Json(content): Json<ThreadContent>,
) -> ApiResult<(StatusCode, Json<Thread>)> {
    let thread = state.threads.create_thread(circle_id, actor, content).await?;
    Ok((StatusCode::CREATED, Json(thread)))
}

#[derive(Deserialize)]
pub struct ListThreadsQuery {
    pub kind: Option<ThreadKind>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub sort: Option<ThreadSort>,
}

pub async fn list_threads(
    State(state): State<AppState>,
    Path(circle_id): Path<Uuid>,
    Query(query): Query<ListThreadsQuery>,
) -> ApiResult<Json<Page<Thread>>> {
    let page = state
        .threads
        .list_threads(circle_id, query.kind, query.page, query.page_size, query.sort)
        .await?;
    Ok(Json(page))
}

pub async fn get_thread(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Thread>> {
    Ok(Json(state.threads.get_thread(id).await?))
}

pub async fn delete_thread(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.threads.delete_thread(id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

pub async fn add_comment(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path(thread_id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = state.comments.add_comment(thread_id, actor, &req.text).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Deserialize)]
pub struct ReactionRequest {
    pub kind: ReactionKind,
}

pub async fn react_to_thread(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path(thread_id): Path<Uuid>,
    Json(req): Json<ReactionRequest>,
) -> ApiResult<Json<ReactionUpdate>> {
    Ok(Json(state.reactions.react_to_thread(thread_id, actor, req.kind).await?))
}

pub async fn react_to_comment(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path((thread_id, comment_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ReactionRequest>,
) -> ApiResult<Json<ReactionUpdate>> {
    Ok(Json(
        state
            .reactions
            .react_to_comment(thread_id, comment_id, actor, req.kind)
            .await?,
    ))
}

#[derive(Deserialize)]
pub struct VoteRequest {
    pub option: String,
}

pub async fn vote(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path(thread_id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> ApiResult<Json<Thread>> {
    Ok(Json(state.polls.vote(thread_id, actor, &req.option).await?))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(state.notifier.feed(actor).await?))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    ActorId(actor): ActorId,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Notification>> {
    Ok(Json(state.notifier.mark_read(id, actor).await?))
}
