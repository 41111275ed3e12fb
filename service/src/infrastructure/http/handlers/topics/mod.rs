use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::{
    domain::{
        AppState,
        repository::query::TopicQuery,
        stats::TopicStats,
        topic::{ContentType, TopicId, TopicStatus},
    },
    infrastructure::http::{
        actor::CurrentActor,
        api::{ApiError, ApiSuccess},
        handlers::topics::dto::{
            ApprovalEventResponse, CommentRequest, CreateTopicRequest, ListTopicsParams,
            ReviewRequest, TopicListResponse, TopicResponse, UpdateTopicRequest,
        },
        querystring::QueryString,
    },
};

pub mod dto;

pub async fn list_topics<S: AppState>(
    State(state): State<S>,
    QueryString(params): QueryString<ListTopicsParams>,
) -> Result<ApiSuccess<TopicListResponse>, ApiError> {
    let mut query = filters(&params)?;
    if let Some(owner) = params.created_by {
        query = query.owned_by(owner);
    }

    let topics = state.workflow().list(query).await?;
    Ok(ApiSuccess::new(StatusCode::OK, TopicListResponse::from(topics)))
}

pub async fn my_topics<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    QueryString(params): QueryString<ListTopicsParams>,
) -> Result<ApiSuccess<TopicListResponse>, ApiError> {
    // createdBy is always the caller here
    let query = filters(&params)?.owned_by(actor.id);

    let topics = state.workflow().list(query).await?;
    Ok(ApiSuccess::new(StatusCode::OK, TopicListResponse::from(topics)))
}

pub async fn topic_stats<S: AppState>(
    State(state): State<S>,
) -> Result<ApiSuccess<TopicStats>, ApiError> {
    let stats = state.workflow().stats(Utc::now()).await?;
    Ok(ApiSuccess::new(StatusCode::OK, stats))
}

pub async fn find_topic_by_id<S: AppState>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<TopicResponse>, ApiError> {
    let details = state.workflow().get(topic_id(&id)?).await?;
    Ok(ApiSuccess::new(StatusCode::OK, TopicResponse::from(details)))
}

pub async fn topic_history<S: AppState>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<Vec<ApprovalEventResponse>>, ApiError> {
    let events = state.workflow().history(topic_id(&id)?).await?;
    let events = events.into_iter().map(ApprovalEventResponse::from).collect();
    Ok(ApiSuccess::new(StatusCode::OK, events))
}

pub async fn create_topic<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    payload: Result<Json<CreateTopicRequest>, JsonRejection>,
) -> Result<ApiSuccess<TopicResponse>, ApiError> {
    let Json(request) = payload.map_err(bad_body)?;
    let topic = state.workflow().create(request.into(), &actor).await?;
    Ok(ApiSuccess::new(StatusCode::CREATED, TopicResponse::from(topic)))
}

pub async fn update_topic<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTopicRequest>, JsonRejection>,
) -> Result<ApiSuccess<TopicResponse>, ApiError> {
    let id = topic_id(&id)?;
    let Json(request) = payload.map_err(bad_body)?;
    let topic = state.workflow().update(id, request.into(), &actor).await?;
    Ok(ApiSuccess::new(StatusCode::OK, TopicResponse::from(topic)))
}

pub async fn delete_topic<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    state.workflow().delete(topic_id(&id)?, &actor).await?;
    Ok(ApiSuccess::empty(StatusCode::OK))
}

pub async fn submit_topic<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<ApiSuccess<TopicResponse>, ApiError> {
    let topic = state.workflow().submit(topic_id(&id)?, &actor).await?;
    Ok(ApiSuccess::new(StatusCode::OK, TopicResponse::from(topic)))
}

pub async fn approve_topic<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<ApiSuccess<TopicResponse>, ApiError> {
    let id = topic_id(&id)?;
    let ReviewRequest { comment } = optional_body(&body)?;
    let details = state.workflow().approve(id, &actor, comment).await?;
    Ok(ApiSuccess::new(StatusCode::OK, TopicResponse::from(details)))
}

pub async fn reject_topic<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<ApiSuccess<TopicResponse>, ApiError> {
    let id = topic_id(&id)?;
    let ReviewRequest { comment } = optional_body(&body)?;
    let details = state.workflow().reject(id, &actor, comment).await?;
    Ok(ApiSuccess::new(StatusCode::OK, TopicResponse::from(details)))
}

pub async fn request_revision<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<ApiSuccess<TopicResponse>, ApiError> {
    let id = topic_id(&id)?;
    let ReviewRequest { comment } = optional_body(&body)?;
    let details = state.workflow().request_revision(id, &actor, comment).await?;
    Ok(ApiSuccess::new(StatusCode::OK, TopicResponse::from(details)))
}

pub async fn comment_on_topic<S: AppState>(
    State(state): State<S>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<ApiSuccess<ApprovalEventResponse>, ApiError> {
    let id = topic_id(&id)?;
    let Json(request) = payload.map_err(bad_body)?;
    let event = state.workflow().comment(id, &actor, request.comment).await?;
    Ok(ApiSuccess::new(StatusCode::CREATED, ApprovalEventResponse::from(event)))
}

/// Ids that are not even well-formed cannot name a topic
fn topic_id(raw: &str) -> Result<TopicId, ApiError> {
    TopicId::try_from(raw).map_err(|_| ApiError::NotFound(format!("topic {} not found", raw)))
}

fn filters(params: &ListTopicsParams) -> Result<TopicQuery, ApiError> {
    let mut query = TopicQuery::new();
    if let Some(status) = params.status.as_deref() {
        let status = status
            .parse::<TopicStatus>()
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        query = query.with_status(status);
    }
    if let Some(content_type) = params.content_type.as_deref() {
        let content_type = content_type
            .parse::<ContentType>()
            .map_err(|err| ApiError::BadRequest(err.to_string()))?;
        query = query.with_content_type(content_type);
    }
    Ok(query)
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

/// Empty bodies are allowed and mean "all defaults"
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::BadRequest(format!("invalid request body: {}", err)))
}
