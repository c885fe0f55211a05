use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::categories::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::dto::common::{ItemResponse, ListResponse, MessageResponse, list_response};
use crate::error::ApiResult;
use crate::state::AppState;

use super::force_flag;

pub async fn list_categories_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ListResponse<CategoryResponse>>> {
    let page = state.catalog.list_categories(&params).await?;
    Ok(Json(list_response(page, CategoryResponse::from)))
}

pub async fn get_category_handler(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> ApiResult<Json<ItemResponse<CategoryResponse>>> {
    let view = state.catalog.get_category(category_id).await?;
    Ok(Json(ItemResponse::new(CategoryResponse::from(view))))
}

pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<ItemResponse<CategoryResponse>>)> {
    let view = state.catalog.create_category(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::new(CategoryResponse::from(view))),
    ))
}

pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> ApiResult<Json<ItemResponse<CategoryResponse>>> {
    let view = state
        .catalog
        .update_category(category_id, payload.into())
        .await?;
    Ok(Json(ItemResponse::new(CategoryResponse::from(view))))
}

pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .catalog
        .delete_category(category_id, force_flag(&params))
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "category '{category_id}' deleted"
    ))))
}
