use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::deck::{
    apply_swipe, reset, study_now, unlock, Card, Page, ProgressionPolicy, StudyState,
    SwipeDirection, SwipeReport, UnlockError,
};
use crate::extractors::JsonBody;
use crate::middleware::rate_limit::check_unlock_attempt;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::SessionEntry;
use crate::validation::normalize_access_code;

/// What the client renders for one session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    session_id: Uuid,
    page: Page,
    deck: Option<DeckHeader>,
    visible_cards: Vec<Card>,
    remaining: usize,
    remembered_count: usize,
    forgotten_count: usize,
    completed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeckHeader {
    title: String,
    card_color: String,
    card_back_color: String,
}

impl SessionView {
    fn build(id: Uuid, state: &StudyState, policy: &ProgressionPolicy) -> Self {
        Self {
            session_id: id,
            page: state.page(),
            deck: state.active.as_ref().map(|active| DeckHeader {
                title: active.title.clone(),
                card_color: active.theme.card_color.clone(),
                card_back_color: active.theme.card_back_color.clone(),
            }),
            visible_cards: state.visible(policy).to_vec(),
            remaining: state.deck.len(),
            remembered_count: state.remembered.len(),
            forgotten_count: state.forgotten.len(),
            completed: state.is_completed(),
        }
    }

    fn from_entry(entry: &SessionEntry, policy: &ProgressionPolicy) -> Self {
        Self::build(entry.id, &entry.state, policy)
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/unlock", post(unlock_session))
        .route("/:id/swipe", post(swipe))
        .route("/:id/study-now", post(study_card_now))
        .route("/:id/reset", post(reset_session))
        .route("/:id/remembered", get(remembered_cards))
        .route("/:id/forgotten", get(forgotten_cards))
}

/// Malformed ids cannot name a live session.
fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("SESSION_NOT_FOUND", "Session not found"))
}

/// Shuffle with a thread-local RNG; kept sync so the RNG never crosses an await.
fn unlock_fresh(state: &AppState, code: &str) -> Result<StudyState, UnlockError> {
    unlock(state.catalog(), code, &mut rand::thread_rng())
}

fn checked_code(raw: &str) -> Result<&str, AppError> {
    normalize_access_code(raw).map_err(|reason| {
        tracing::debug!(reason, "Rejected access code input");
        AppError::from(UnlockError::InvalidCode)
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest {
    #[serde(default)]
    code: Option<String>,
}

async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let request: CreateSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(error = %e, "Create session body rejected");
            AppError::bad_request("INVALID_REQUEST_BODY", "Invalid request body")
        })?
    };

    let initial = match request.code.as_deref() {
        Some(raw) => {
            check_unlock_attempt(&state, &headers).await?;
            let code = checked_code(raw)?;
            unlock_fresh(&state, code)?
        }
        None => StudyState::landing(),
    };

    let entry = state.store().create(initial).await?;
    tracing::info!(
        session_id = %entry.id,
        unlocked = entry.state.active.is_some(),
        "Session created"
    );
    Ok(created(SessionView::from_entry(&entry, state.policy())))
}

async fn get_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    let entry = state.store().get(id).await?;
    Ok(ok(SessionView::from_entry(&entry, state.policy())))
}

async fn delete_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    state.store().remove(id).await?;
    tracing::info!(session_id = %id, "Session ended");
    Ok(ok(serde_json::json!({ "deleted": true, "sessionId": id })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnlockRequest {
    code: String,
}

async fn unlock_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<UnlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    check_unlock_attempt(&state, &headers).await?;
    let code = checked_code(&req.code)?;

    let (entry, ()) = state
        .store()
        .transition(id, |_| {
            let next = unlock_fresh(&state, code)?;
            Ok::<_, AppError>((next, ()))
        })
        .await?;

    tracing::info!(
        session_id = %id,
        cards = entry.state.deck.len(),
        "Deck unlocked"
    );
    Ok(ok(SessionView::from_entry(&entry, state.policy())))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwipeRequest {
    direction: SwipeDirection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwipeResponse {
    session: SessionView,
    swipe: Option<SwipeReport>,
}

async fn swipe(
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SwipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    let policy = *state.policy();

    let (entry, report) = state
        .store()
        .transition(id, |current| {
            Ok::<_, AppError>(apply_swipe(current, req.direction, &policy))
        })
        .await?;

    match &report {
        Some(report) => tracing::debug!(
            session_id = %id,
            direction = report.direction.as_str(),
            level = report.level,
            placement = ?report.placement,
            "Card swiped"
        ),
        None => tracing::debug!(session_id = %id, "Swipe on empty deck ignored"),
    }

    Ok(ok(SwipeResponse {
        session: SessionView::from_entry(&entry, &policy),
        swipe: report,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudyNowRequest {
    key: Uuid,
}

async fn study_card_now(
    Path(id): Path<String>,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<StudyNowRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    let (entry, ()) = state
        .store()
        .transition(id, |current| {
            let next = study_now(current, req.key)?;
            Ok::<_, AppError>((next, ()))
        })
        .await?;
    Ok(ok(SessionView::from_entry(&entry, state.policy())))
}

async fn reset_session(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    let (entry, ()) = state
        .store()
        .transition(id, |_| Ok::<_, AppError>((reset(), ())))
        .await?;
    tracing::info!(session_id = %id, "Session reset");
    Ok(ok(SessionView::from_entry(&entry, state.policy())))
}

async fn remembered_cards(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    let entry = state.store().get(id).await?;
    Ok(ok(entry.state.remembered))
}

async fn forgotten_cards(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_session_id(&id)?;
    let entry = state.store().get(id).await?;
    Ok(ok(entry.state.forgotten))
}
