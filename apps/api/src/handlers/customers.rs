use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::common::{ItemResponse, ListResponse, MessageResponse, list_response};
use crate::dto::customers::{CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::force_flag;

pub async fn list_customers_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ListResponse<CustomerResponse>>> {
    let page = state.sales.list_customers(&params).await?;
    Ok(Json(list_response(page, CustomerResponse::from)))
}

pub async fn get_customer_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
) -> ApiResult<Json<ItemResponse<CustomerResponse>>> {
    let view = state.sales.get_customer(customer_id).await?;
    Ok(Json(ItemResponse::new(CustomerResponse::from(view))))
}

pub async fn create_customer_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<ItemResponse<CustomerResponse>>)> {
    let view = state.sales.create_customer(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::new(CustomerResponse::from(view))),
    ))
}

pub async fn update_customer_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> ApiResult<Json<ItemResponse<CustomerResponse>>> {
    let view = state
        .sales
        .update_customer(customer_id, payload.into())
        .await?;
    Ok(Json(ItemResponse::new(CustomerResponse::from(view))))
}

pub async fn delete_customer_handler(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .sales
        .delete_customer(customer_id, force_flag(&params))
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "customer '{customer_id}' deleted"
    ))))
}
