use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::common::{ItemResponse, ListResponse, MessageResponse, list_response};
use crate::dto::shippers::{CreateShipperRequest, ShipperResponse, UpdateShipperRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::force_flag;

pub async fn list_shippers_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ListResponse<ShipperResponse>>> {
    let page = state.sales.list_shippers(&params).await?;
    Ok(Json(list_response(page, ShipperResponse::from)))
}

pub async fn get_shipper_handler(
    State(state): State<AppState>,
    Path(shipper_id): Path<i32>,
) -> ApiResult<Json<ItemResponse<ShipperResponse>>> {
    let view = state.sales.get_shipper(shipper_id).await?;
    Ok(Json(ItemResponse::new(ShipperResponse::from(view))))
}

pub async fn create_shipper_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateShipperRequest>,
) -> ApiResult<(StatusCode, Json<ItemResponse<ShipperResponse>>)> {
    let view = state.sales.create_shipper(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::new(ShipperResponse::from(view))),
    ))
}

pub async fn update_shipper_handler(
    State(state): State<AppState>,
    Path(shipper_id): Path<i32>,
    Json(payload): Json<UpdateShipperRequest>,
) -> ApiResult<Json<ItemResponse<ShipperResponse>>> {
    let view = state.sales.update_shipper(shipper_id, payload.into()).await?;
    Ok(Json(ItemResponse::new(ShipperResponse::from(view))))
}

pub async fn delete_shipper_handler(
    State(state): State<AppState>,
    Path(shipper_id): Path<i32>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .sales
        .delete_shipper(shipper_id, force_flag(&params))
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "shipper '{shipper_id}' deleted"
    ))))
}
