use crate::adapters::http::error::ApiError;
use crate::adapters::http::AppState;
use crate::core::{CatalogStore, EntryId, FulfillmentPlan, PackageSize};
use crate::utils::error::CalcError;
use crate::utils::validation::whole_number;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct AddPackageRequest {
    #[serde(rename = "packageSize")]
    pub package_size: Value,
}

#[derive(Debug, Serialize)]
pub struct AddPackageResponse {
    pub id: EntryId,
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn list_packages<C: CatalogStore + 'static>(
    State(state): State<AppState<C>>,
) -> Result<Json<IndexMap<EntryId, PackageSize>>, ApiError> {
    let packages = state.calculator.list_packages().await?;
    Ok(Json(packages))
}

pub async fn add_package<C: CatalogStore + 'static>(
    State(state): State<AppState<C>>,
    body: Result<Json<AddPackageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddPackageResponse>), ApiError> {
    let Json(request) = body?;
    let size = whole_number(&request.package_size)
        .ok_or_else(|| CalcError::invalid_size(&request.package_size))?;

    let id = state.calculator.add_package(size).await?;
    Ok((StatusCode::CREATED, Json(AddPackageResponse { id })))
}

pub async fn delete_package<C: CatalogStore + 'static>(
    State(state): State<AppState<C>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.calculator.remove_package(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Body is either a bare JSON integer or `{"orderSize": <int>}`.
pub async fn calculate<C: CatalogStore + 'static>(
    State(state): State<AppState<C>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<FulfillmentPlan>, ApiError> {
    let Json(body) = body?;
    let raw = match body {
        Value::Object(mut fields) => fields.remove("orderSize").unwrap_or(Value::Null),
        other => other,
    };
    let order_size = whole_number(&raw).ok_or_else(|| CalcError::invalid_order_size(&raw))?;

    let plan = state.calculator.calculate(order_size).await?;
    Ok(Json(plan))
}
