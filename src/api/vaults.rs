//! Vault query endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::AppState;
use crate::domain::Address;
use crate::error::AppError;

/// Normalize a path address the same way ingestion does; a malformed
/// address is a client error, not a missing row.
fn normalize(address: &str) -> Result<Address, AppError> {
    Address::parse(address).map_err(|err| AppError::BadRequest(err.to_string()))
}

pub async fn list_vaults(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let vaults = state.repo.list_vaults().await?;
    Ok(Json(json!({ "vaults": vaults })))
}

pub async fn get_vault(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = normalize(&address)?.to_string();
    match state.repo.get_vault(&id).await? {
        Some(vault) => Ok(Json(json!({ "vault": vault }))),
        None => Err(AppError::NotFound(format!("vault {} not found", id))),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatesQuery {
    pub limit: Option<i64>,
}

pub async fn list_updates(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<UpdatesQuery>,
) -> Result<Json<Value>, AppError> {
    let id = normalize(&address)?.to_string();
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let updates = state.repo.list_vault_updates(&id, limit).await?;
    Ok(Json(json!({ "vault": id, "updates": updates })))
}

pub async fn list_day_data(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = normalize(&address)?.to_string();
    let day_data = state.repo.list_vault_day_data(&id).await?;
    Ok(Json(json!({ "vault": id, "day_data": day_data })))
}
