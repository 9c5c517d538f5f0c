// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout API routes.
//!
//! Every endpoint is a POST. Lookups and deletes take a bare timestamp as
//! the request body; `enterWorkout` takes a JSON workout payload.

use crate::error::{AppError, Result};
use crate::models::Timestamp;
use crate::payload::{decode_timestamp, decode_workout};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Workout API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/getDates", post(get_dates))
        .route("/api/delDate", post(del_date))
        .route("/api/getWeight", post(get_weight))
        .route("/api/getRun", post(get_run))
        .route("/api/enterWorkout", post(enter_workout))
}

/// List every logged day.
async fn get_dates(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Timestamp>>> {
    tracing::info!("POST - getDates");

    let timestamps = state.db.list_timestamps().await?;
    Ok(Json(timestamps))
}

/// Delete a day and its activities.
async fn del_date(State(state): State<Arc<AppState>>, body: Bytes) -> Result<StatusCode> {
    tracing::info!("POST - delDate");

    let timestamp = decode_timestamp(&body)?;
    state
        .db
        .delete_workout(timestamp)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Weight-lifting entry for a day, or `{}` when none was logged.
async fn get_weight(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    tracing::info!("POST - getWeight");

    let timestamp = decode_timestamp(&body)?;
    let workout = state
        .db
        .find_workout(timestamp)
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(entry_or_empty(workout.weight_lifting))
}

/// Running entry for a day, or `{}` when none was logged.
async fn get_run(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    tracing::info!("POST - getRun");

    let timestamp = decode_timestamp(&body)?;
    let workout = state
        .db
        .find_workout(timestamp)
        .await
        .map_err(|e| AppError::NotFound(e.to_string()))?;

    Ok(entry_or_empty(workout.running))
}

/// Record a day's weight lifting and/or running.
async fn enter_workout(State(state): State<Arc<AppState>>, body: Bytes) -> Result<StatusCode> {
    tracing::info!("POST - enterWorkout");

    let workout = decode_workout(&body)?;
    state
        .db
        .upsert_workout(&workout)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(StatusCode::CREATED)
}

fn entry_or_empty<T: Serialize>(entry: Option<T>) -> Response {
    match entry {
        Some(entry) => Json(entry).into_response(),
        None => Json(json!({})).into_response(),
    }
}
