//! HTTP request handlers

use super::state::AppState;
use crate::config::SearchBarApi;
use crate::orchestrator::{SearchBar, SearchBarInput};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Response of session creation
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub id: Uuid,
    pub search_api_variant: SearchBarApi,
}

/// Body of a strategy switch
#[derive(Debug, Deserialize)]
pub struct VariantParams {
    pub api_variant: SearchBarApi,
}

fn not_found(id: Uuid) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("Unknown session {}", id) })),
    )
        .into_response()
}

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<SearchBar>, Response> {
    state.sessions.get(&id).await.ok_or_else(|| not_found(id))
}

/// Start a search bar session
pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let (id, bar) = state.sessions.create().await;
    info!("Opened session {} using {}", id, bar.api_variant());

    (
        StatusCode::CREATED,
        Json(SessionCreated {
            id,
            search_api_variant: bar.api_variant(),
        }),
    )
}

/// Current result snapshot of a session
pub async fn get_snapshot(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match find_session(&state, id).await {
        Ok(bar) => Json(bar.snapshot()).into_response(),
        Err(response) => response,
    }
}

/// Push new query, filters and view
pub async fn update_input(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<SearchBarInput>,
) -> Response {
    match find_session(&state, id).await {
        Ok(bar) => {
            bar.update(input);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(response) => response,
    }
}

/// Switch the session's backend strategy
pub async fn update_variant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(params): Json<VariantParams>,
) -> Response {
    match find_session(&state, id).await {
        Ok(bar) => {
            bar.set_api_variant(params.api_variant);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(response) => response,
    }
}

/// Close a session
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    if state.sessions.remove(&id).await {
        info!("Closed session {}", id);
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found(id)
    }
}

/// Server-sent snapshots: the current one, then every change
pub async fn snapshot_events(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let bar = match find_session(&state, id).await {
        Ok(bar) => bar,
        Err(response) => return response,
    };

    let mut updates = bar.subscribe();
    let current = updates.borrow_and_update().clone();

    let sessions = state.sessions.clone();
    let touch_every = sessions.idle_timeout() / 3;

    let first = stream::once(async move { Event::default().event("snapshot").json_data(current) });
    let changes = stream::unfold(updates, move |mut updates| {
        let sessions = sessions.clone();
        async move {
            // Following the stream keeps the session alive; ends once it is gone
            loop {
                tokio::select! {
                    changed = updates.changed() => {
                        changed.ok()?;
                        break;
                    }
                    _ = tokio::time::sleep(touch_every) => {
                        sessions.get(&id).await?;
                    }
                }
            }
            let snapshot = updates.borrow_and_update().clone();
            Some((Event::default().event("snapshot").json_data(snapshot), updates))
        }
    });

    Sse::new(first.chain(changes))
        .keep_alive(KeepAlive::default())
        .into_response()
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}

/// Orchestration statistics
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "live_sessions": state.sessions.len(),
        "metrics": state.metrics.snapshot(),
    }))
}
