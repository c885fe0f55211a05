use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::dto::common::{ItemResponse, ListResponse, MessageResponse, list_response};
use crate::dto::employees::{
    CreateEmployeeRequest, EmployeeResponse, HierarchyNodeResponse, UpdateEmployeeRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::force_flag;

pub async fn list_employees_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ListResponse<EmployeeResponse>>> {
    let page = state.directory.list_employees(&params).await?;
    Ok(Json(list_response(page, EmployeeResponse::from)))
}

pub async fn employee_hierarchy_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<ItemResponse<Vec<HierarchyNodeResponse>>>> {
    let roots = state.directory.hierarchy().await?;
    Ok(Json(ItemResponse::new(
        roots.into_iter().map(HierarchyNodeResponse::from).collect(),
    )))
}

pub async fn get_employee_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ItemResponse<EmployeeResponse>>> {
    let view = state.directory.get_employee(employee_id, &params).await?;
    Ok(Json(ItemResponse::new(EmployeeResponse::from(view))))
}

pub async fn create_employee_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<ItemResponse<EmployeeResponse>>)> {
    let view = state.directory.create_employee(payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::new(EmployeeResponse::from(view))),
    ))
}

pub async fn update_employee_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> ApiResult<Json<ItemResponse<EmployeeResponse>>> {
    let view = state
        .directory
        .update_employee(employee_id, payload.into())
        .await?;
    Ok(Json(ItemResponse::new(EmployeeResponse::from(view))))
}

pub async fn delete_employee_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .directory
        .delete_employee(employee_id, force_flag(&params))
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "employee '{employee_id}' deleted"
    ))))
}
