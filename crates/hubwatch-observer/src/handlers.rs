//! REST API endpoint handlers for the Observer server.
//!
//! All handlers read through the shared [`AppState`]. Entry IDs in paths
//! are the UUIDs the listing endpoint returns.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness probe |
//! | `GET` | `/api/hub` | Latest meta aggregate |
//! | `GET` | `/api/servers` | Current entries, busiest first |
//! | `GET` | `/api/servers/{id}` | Single entry |
//! | `GET` | `/api/servers/{id}/history` | Recent player-count timeline |
//! | `GET` | `/api/servers/{id}/averages` | Hourly or weekday averages |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::IntoResponse;
use chrono::{TimeDelta, Utc};
use hubwatch_core::stats::{self, BucketAverage};
use hubwatch_core::store::Store;
use hubwatch_types::{Entry, EntryId};
use uuid::Uuid;

use crate::error::ObserverError;
use crate::state::AppState;

/// How far back the averages endpoint looks.
const AVERAGES_WINDOW_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/servers/{id}/history` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct HistoryQuery {
    /// `daily` (last 24 hours, default) or `weekly` (last 7 days).
    pub period: Option<String>,
}

/// Query parameters for the `GET /api/servers/{id}/averages` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct AveragesQuery {
    /// `hour` (default) or `weekday`.
    pub by: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Liveness probe. Reports the storage backend, whether it answers, and
/// whether a cycle has published a meta entry yet.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let reachable = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach storage");
            false
        }
    };

    Json(serde_json::json!({
        "status": "ok",
        "storage": state.store.kind(),
        "storage_reachable": reachable,
        "cycled": state.meta.latest().is_some(),
        "started_at": state.started_at,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/hub
// ---------------------------------------------------------------------------

/// Return the latest meta entry: the total player count across the hub.
pub async fn get_hub(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let meta = state
        .meta
        .latest()
        .ok_or_else(|| ObserverError::NotReady("no poll cycle has completed yet".to_owned()))?;

    Ok(Json(serde_json::json!({
        "players": meta.players,
        "time": meta.last_seen,
        "entry": meta,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/servers
// ---------------------------------------------------------------------------

/// List stored entries except the meta entry, busiest first, then by title.
pub async fn list_servers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let mut servers: Vec<Entry> = state
        .store
        .load_entries()
        .await?
        .into_iter()
        .filter(|e| !e.is_meta())
        .collect();

    servers.sort_by(|a, b| {
        b.players
            .cmp(&a.players)
            .then_with(|| a.title.cmp(&b.title))
    });

    Ok(Json(serde_json::json!({
        "count": servers.len(),
        "servers": servers,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/servers/{id}
// ---------------------------------------------------------------------------

/// Return one stored entry.
pub async fn get_server(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let id = parse_entry_id(&id_str)?;

    let entry = state
        .store
        .entry(id)
        .await?
        .ok_or_else(|| ObserverError::NotFound(format!("server {id}")))?;

    Ok(Json(entry))
}

// ---------------------------------------------------------------------------
// GET /api/servers/{id}/history
// ---------------------------------------------------------------------------

/// Return an entry's history over the requested period, oldest first.
///
/// History outlives eviction, so this answers for IDs that are no longer
/// in the listing.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let id = parse_entry_id(&id_str)?;

    let (period, window) = match params.period.as_deref().unwrap_or("daily") {
        "daily" => ("daily", TimeDelta::hours(24)),
        "weekly" => ("weekly", TimeDelta::days(7)),
        other => {
            return Err(ObserverError::InvalidQuery(format!(
                "period must be daily or weekly, got {other}"
            )));
        }
    };

    let since = Utc::now() - window;
    let points = state.store.history(id, since).await?;

    let points: Vec<serde_json::Value> = points
        .iter()
        .map(|p| serde_json::json!({ "time": p.time, "players": p.players }))
        .collect();

    Ok(Json(serde_json::json!({
        "id": id,
        "period": period,
        "since": since,
        "count": points.len(),
        "points": points,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/servers/{id}/averages
// ---------------------------------------------------------------------------

/// Return mean players per hour of day or per weekday over the last 30 days.
pub async fn get_averages(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    Query(params): Query<AveragesQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let id = parse_entry_id(&id_str)?;
    let by = params.by.as_deref().unwrap_or("hour");
    if by != "hour" && by != "weekday" {
        return Err(ObserverError::InvalidQuery(format!(
            "by must be hour or weekday, got {by}"
        )));
    }

    let since = Utc::now() - TimeDelta::days(AVERAGES_WINDOW_DAYS);
    let points = state.store.history(id, since).await?;

    let buckets: Vec<serde_json::Value> = if by == "hour" {
        stats::average_by_hour(&points)
            .iter()
            .map(bucket_json)
            .collect()
    } else {
        stats::average_by_weekday(&points)
            .iter()
            .map(|b| {
                serde_json::json!({
                    "bucket": b.bucket,
                    "weekday": stats::weekday_name(b.bucket),
                    "players": b.players,
                    "samples": b.samples,
                })
            })
            .collect()
    };

    Ok(Json(serde_json::json!({
        "id": id,
        "by": by,
        "since": since,
        "samples": points.len(),
        "buckets": buckets,
    })))
}

/// Fallback for paths outside the route table.
pub async fn not_found(uri: Uri) -> ObserverError {
    ObserverError::NotFound(format!("route {}", uri.path()))
}

fn bucket_json(bucket: &BucketAverage) -> serde_json::Value {
    serde_json::json!({
        "bucket": bucket.bucket,
        "players": bucket.players,
        "samples": bucket.samples,
    })
}

fn parse_entry_id(s: &str) -> Result<EntryId, ObserverError> {
    s.parse::<Uuid>()
        .map(EntryId::from)
        .map_err(|e| ObserverError::InvalidUuid(format!("{s}: {e}")))
}
