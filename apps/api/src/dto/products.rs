use northwind_application::{CreateProduct, ProductView, UpdateProduct};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::categories::CategoryRecord;
use super::common::double_option;
use super::suppliers::SupplierRecord;

/// Product payload with derived fields attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_id: i32,
    pub product_name: String,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
    pub quantity_per_unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub units_in_stock: i16,
    pub units_on_order: i16,
    pub reorder_level: i16,
    pub discontinued: bool,
    pub stock_status: &'static str,
    pub health_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierRecord>,
}

impl From<ProductView> for ProductResponse {
    fn from(view: ProductView) -> Self {
        Self {
            product_id: view.product.product_id(),
            product_name: view.product.product_name().to_owned(),
            supplier_id: view.product.supplier_id(),
            category_id: view.product.category_id(),
            quantity_per_unit: view.product.quantity_per_unit().map(str::to_owned),
            unit_price: view.product.unit_price(),
            units_in_stock: view.product.units_in_stock(),
            units_on_order: view.product.units_on_order(),
            reorder_level: view.product.reorder_level(),
            discontinued: view.product.discontinued(),
            stock_status: view.stock_status.as_str(),
            health_score: view.health_score,
            category: view.category.map(CategoryRecord::from),
            supplier: view.supplier.map(SupplierRecord::from),
        }
    }
}

/// Create-product request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub product_name: String,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
    pub quantity_per_unit: Option<String>,
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub units_in_stock: i16,
    #[serde(default)]
    pub units_on_order: i16,
    #[serde(default)]
    pub reorder_level: i16,
    #[serde(default)]
    pub discontinued: bool,
}

impl From<CreateProductRequest> for CreateProduct {
    fn from(request: CreateProductRequest) -> Self {
        Self {
            product_name: request.product_name,
            supplier_id: request.supplier_id,
            category_id: request.category_id,
            quantity_per_unit: request.quantity_per_unit,
            unit_price: request.unit_price,
            units_in_stock: request.units_in_stock,
            units_on_order: request.units_on_order,
            reorder_level: request.reorder_level,
            discontinued: request.discontinued,
        }
    }
}

/// Partial update request body for a product.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub supplier_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub quantity_per_unit: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub unit_price: Option<Option<Decimal>>,
    pub units_in_stock: Option<i16>,
    pub units_on_order: Option<i16>,
    pub reorder_level: Option<i16>,
    pub discontinued: Option<bool>,
}

impl From<UpdateProductRequest> for UpdateProduct {
    fn from(request: UpdateProductRequest) -> Self {
        Self {
            product_name: request.product_name,
            supplier_id: request.supplier_id,
            category_id: request.category_id,
            quantity_per_unit: request.quantity_per_unit,
            unit_price: request.unit_price,
            units_in_stock: request.units_in_stock,
            units_on_order: request.units_on_order,
            reorder_level: request.reorder_level,
            discontinued: request.discontinued,
        }
    }
}
