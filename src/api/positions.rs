//! Account position endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::api::AppState;
use crate::domain::Address;
use crate::error::AppError;

pub async fn list_positions(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Value>, AppError> {
    let account = Address::parse(&address)
        .map_err(|err| AppError::BadRequest(err.to_string()))?
        .to_string();
    let positions = state.repo.list_positions_for_account(&account).await?;
    Ok(Json(json!({ "account": account, "positions": positions })))
}
