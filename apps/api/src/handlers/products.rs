use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::common::{ItemResponse, ListResponse, MessageResponse, list_response};
use crate::dto::products::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::force_flag;

pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ListResponse<ProductResponse>>> {
    let page = state.catalog.list_products(&params).await?;
    Ok(Json(list_response(page, ProductResponse::from)))
}

pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ItemResponse<ProductResponse>>> {
    let view = state.catalog.get_product(product_id, &params).await?;
    Ok(Json(ItemResponse::new(ProductResponse::from(view))))
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ItemResponse<ProductResponse>>)> {
    let view = state.catalog.create_product(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::new(ProductResponse::from(view))),
    ))
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> ApiResult<Json<ItemResponse<ProductResponse>>> {
    let view = state
        .catalog
        .update_product(product_id, payload.into())
        .await?;
    Ok(Json(ItemResponse::new(ProductResponse::from(view))))
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .catalog
        .delete_product(product_id, force_flag(&params))
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "product '{product_id}' deleted"
    ))))
}
