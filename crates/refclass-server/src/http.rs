//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use refclass_core::{ClassificationField, ListItem, ReferenceView, RefclassError, Vocabulary};

use crate::{AppState, Notification};

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Map a core error onto an HTTP status
pub fn api_error(err: RefclassError) -> (StatusCode, String) {
    let status = match &err {
        RefclassError::Parse(_) | RefclassError::InvalidOption { .. } => StatusCode::BAD_REQUEST,
        RefclassError::NoSelection => StatusCode::NOT_FOUND,
        RefclassError::Fetch(_)
        | RefclassError::Storage(_)
        | RefclassError::Config(_)
        | RefclassError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("{}", err);
    }
    (status, err.to_string())
}

/// Group selector shared by every endpoint (`?uuid=...`)
#[derive(Debug, Default, Deserialize)]
pub struct GroupQuery {
    pub uuid: Option<String>,
}

impl GroupQuery {
    /// The group id, with an empty parameter treated as absent
    pub fn group(&self) -> Option<&str> {
        self.uuid.as_deref().filter(|g| !g.is_empty())
    }
}

/// Get both option lists
pub async fn get_vocabulary() -> Json<Vocabulary> {
    Json(Vocabulary::default())
}

/// List the group's references with the current one marked
pub async fn list_references(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupQuery>,
) -> ApiResult<Json<Vec<ListItem>>> {
    state
        .with_session(query.group(), |s| Ok(s.list()))
        .await
        .map(Json)
        .map_err(api_error)
}

/// Get the current reference
pub async fn get_current(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupQuery>,
) -> ApiResult<Json<ReferenceView>> {
    state
        .with_session(query.group(), |s| s.current().ok_or(RefclassError::NoSelection))
        .await
        .map(Json)
        .map_err(api_error)
}

/// Step direction for relative navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Prev,
    Next,
}

/// Request to move the selection: `{"index": 3}` or `{"direction": "next"}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NavigateRequest {
    Index { index: usize },
    Step { direction: Direction },
}

/// Move the selection. Out-of-range moves leave it unchanged.
pub async fn navigate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupQuery>,
    Json(request): Json<NavigateRequest>,
) -> ApiResult<Json<ReferenceView>> {
    state
        .with_session(query.group(), |s| {
            match request {
                NavigateRequest::Index { index } => s.go_to(index),
                NavigateRequest::Step { direction: Direction::Prev } => s.prev(),
                NavigateRequest::Step { direction: Direction::Next } => s.next(),
            };
            s.current().ok_or(RefclassError::NoSelection)
        })
        .await
        .map(Json)
        .map_err(api_error)
}

/// Request to click an option button
#[derive(Debug, Deserialize)]
pub struct OptionRequest {
    pub value: String,
}

async fn select_option(
    state: &AppState,
    query: &GroupQuery,
    field: ClassificationField,
    value: &str,
) -> ApiResult<Json<ReferenceView>> {
    state
        .with_session(query.group(), |s| {
            s.select_option(field, value)?;
            s.current().ok_or(RefclassError::NoSelection)
        })
        .await
        .map(Json)
        .map_err(api_error)
}

/// Toggle the reference type of the current reference
pub async fn set_article_type(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupQuery>,
    Json(request): Json<OptionRequest>,
) -> ApiResult<Json<ReferenceView>> {
    select_option(&state, &query, ClassificationField::ArticleType, &request.value).await
}

/// Toggle the subject of study of the current reference
pub async fn set_topic(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupQuery>,
    Json(request): Json<OptionRequest>,
) -> ApiResult<Json<ReferenceView>> {
    select_option(&state, &query, ClassificationField::Topic, &request.value).await
}

/// Request to replace the motivation text
#[derive(Debug, Deserialize)]
pub struct MotivationRequest {
    pub text: String,
}

/// Overwrite the motivation of the current reference
pub async fn set_motivation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupQuery>,
    Json(request): Json<MotivationRequest>,
) -> ApiResult<Json<ReferenceView>> {
    state
        .with_session(query.group(), |s| {
            s.set_motivation(&request.text)?;
            s.current().ok_or(RefclassError::NoSelection)
        })
        .await
        .map(Json)
        .map_err(api_error)
}

/// Download the classified records as a JSON file
pub async fn export(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupQuery>,
) -> ApiResult<impl IntoResponse> {
    let file = state
        .with_session(query.group(), |s| s.export_file())
        .await
        .map_err(api_error)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.contents,
    ))
}

/// Response for an import
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub applied: usize,
    pub current: Option<ReferenceView>,
}

/// Merge an uploaded export file (raw JSON body)
pub async fn import(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupQuery>,
    body: String,
) -> ApiResult<Json<ImportResponse>> {
    state
        .with_session(query.group(), |s| {
            let applied = s.import_json(&body)?;
            Ok(ImportResponse {
                applied,
                current: s.current(),
            })
        })
        .await
        .map(Json)
        .map_err(api_error)
}

/// Send the classified records to the collection endpoint
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GroupQuery>,
) -> ApiResult<Json<Notification>> {
    let payload = state
        .with_session(query.group(), |s| Ok(s.submission_payload()))
        .await
        .map_err(api_error)?;

    // Session lock is released here; the network call runs unlocked.
    Ok(Json(state.submitter.submit_and_notify(&payload).await))
}
