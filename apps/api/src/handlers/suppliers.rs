use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::common::{ItemResponse, ListResponse, MessageResponse, list_response};
use crate::dto::suppliers::{CreateSupplierRequest, SupplierResponse, UpdateSupplierRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::force_flag;

pub async fn list_suppliers_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ListResponse<SupplierResponse>>> {
    let page = state.catalog.list_suppliers(&params).await?;
    Ok(Json(list_response(page, SupplierResponse::from)))
}

pub async fn get_supplier_handler(
    State(state): State<AppState>,
    Path(supplier_id): Path<i32>,
) -> ApiResult<Json<ItemResponse<SupplierResponse>>> {
    let view = state.catalog.get_supplier(supplier_id).await?;
    Ok(Json(ItemResponse::new(SupplierResponse::from(view))))
}

pub async fn create_supplier_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> ApiResult<(StatusCode, Json<ItemResponse<SupplierResponse>>)> {
    let view = state.catalog.create_supplier(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::new(SupplierResponse::from(view))),
    ))
}

pub async fn update_supplier_handler(
    State(state): State<AppState>,
    Path(supplier_id): Path<i32>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> ApiResult<Json<ItemResponse<SupplierResponse>>> {
    let view = state
        .catalog
        .update_supplier(supplier_id, payload.into())
        .await?;
    Ok(Json(ItemResponse::new(SupplierResponse::from(view))))
}

pub async fn delete_supplier_handler(
    State(state): State<AppState>,
    Path(supplier_id): Path<i32>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .catalog
        .delete_supplier(supplier_id, force_flag(&params))
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "supplier '{supplier_id}' deleted"
    ))))
}
