//! HTTP routes and handlers for `/api/v1/beers`.

use crate::dto::{BeerDto, QuantityDto};
use crate::errors::ApiError;
use crate::state::AppState;
use crate::BEERS_BASE_PATH;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use beerstock_core::{core_version, BeerId};
use serde_json::json;

/// Beer resource routes. The collection answers with and without a
/// trailing slash.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(BEERS_BASE_PATH, post(create_beer).get(list_beers))
        .route(
            &format!("{BEERS_BASE_PATH}/"),
            post(create_beer).get(list_beers),
        )
        .route(
            &format!("{BEERS_BASE_PATH}/:key"),
            get(find_beer).delete(delete_beer),
        )
        .route(
            &format!("{BEERS_BASE_PATH}/:key/increment"),
            patch(increment_beer),
        )
        .route(
            &format!("{BEERS_BASE_PATH}/:key/decrement"),
            patch(decrement_beer),
        )
}

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": core_version(),
    }))
}

pub async fn create_beer(
    State(state): State<AppState>,
    payload: Result<Json<BeerDto>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let beer = parse_json(payload)?.into_beer()?;
    let created = state.run(move |service| service.create(&beer)).await?;
    Ok((StatusCode::CREATED, Json(BeerDto::from(&created))))
}

pub async fn list_beers(State(state): State<AppState>) -> Result<Json<Vec<BeerDto>>, ApiError> {
    let beers = state.run(|service| service.list_all()).await?;
    Ok(Json(beers.iter().map(BeerDto::from).collect()))
}

pub async fn find_beer(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BeerDto>, ApiError> {
    let beer = state.run(move |service| service.find_by_name(&name)).await?;
    Ok(Json(BeerDto::from(&beer)))
}

pub async fn delete_beer(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&key)?;
    state.run(move |service| service.delete_by_id(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn increment_beer(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: Result<Json<QuantityDto>, JsonRejection>,
) -> Result<Json<BeerDto>, ApiError> {
    let id = parse_id(&key)?;
    let amount = parse_json(payload)?.into_amount()?;
    let beer = state
        .run(move |service| service.increment(id, amount))
        .await?;
    Ok(Json(BeerDto::from(&beer)))
}

pub async fn decrement_beer(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: Result<Json<QuantityDto>, JsonRejection>,
) -> Result<Json<BeerDto>, ApiError> {
    let id = parse_id(&key)?;
    let amount = parse_json(payload)?.into_amount()?;
    let beer = state
        .run(move |service| service.decrement(id, amount))
        .await?;
    Ok(Json(BeerDto::from(&beer)))
}

fn parse_id(key: &str) -> Result<BeerId, ApiError> {
    key.parse::<BeerId>()
        .map_err(|_| ApiError::BadRequest(format!("`{key}` is not a valid beer id")))
}

fn parse_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}
