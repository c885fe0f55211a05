use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::common::{ItemResponse, ListResponse, MessageResponse, list_response};
use crate::dto::orders::{CreateOrderRequest, OrderResponse, UpdateOrderRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_orders_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ListResponse<OrderResponse>>> {
    let page = state.sales.list_orders(&params).await?;
    Ok(Json(list_response(page, OrderResponse::from)))
}

pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ItemResponse<OrderResponse>>> {
    let view = state.sales.get_order(order_id, &params).await?;
    Ok(Json(ItemResponse::new(OrderResponse::from(view))))
}

pub async fn create_order_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<ItemResponse<OrderResponse>>)> {
    let view = state.sales.create_order(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::new(OrderResponse::from(view))),
    ))
}

pub async fn update_order_handler(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    Json(payload): Json<UpdateOrderRequest>,
) -> ApiResult<Json<ItemResponse<OrderResponse>>> {
    let view = state.sales.update_order(order_id, payload.into()).await?;
    Ok(Json(ItemResponse::new(OrderResponse::from(view))))
}

pub async fn delete_order_handler(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    state.sales.delete_order(order_id).await?;
    Ok(Json(MessageResponse::new(format!(
        "order '{order_id}' deleted"
    ))))
}
