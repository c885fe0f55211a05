use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Query, State};

use crate::dto::common::ItemResponse;
use crate::dto::reports::{
    CategorySalesResponse, SupplierStatsResponse, TopCustomerResponse, YearlySalesResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn top_customers_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ItemResponse<Vec<TopCustomerResponse>>>> {
    let ranked = state.reports.top_customers(&params).await?;
    Ok(Json(ItemResponse::new(
        ranked.into_iter().map(TopCustomerResponse::from).collect(),
    )))
}

pub async fn sales_by_category_handler(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<ItemResponse<Vec<CategorySalesResponse>>>> {
    let rows = state.reports.sales_by_category(&params).await?;
    Ok(Json(ItemResponse::new(
        rows.into_iter().map(CategorySalesResponse::from).collect(),
    )))
}

pub async fn sales_by_year_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<ItemResponse<Vec<YearlySalesResponse>>>> {
    let rows = state.reports.sales_by_year().await?;
    Ok(Json(ItemResponse::new(
        rows.into_iter().map(YearlySalesResponse::from).collect(),
    )))
}

pub async fn supplier_stats_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<ItemResponse<Vec<SupplierStatsResponse>>>> {
    let rows = state.reports.supplier_stats().await?;
    Ok(Json(ItemResponse::new(
        rows.into_iter().map(SupplierStatsResponse::from).collect(),
    )))
}
