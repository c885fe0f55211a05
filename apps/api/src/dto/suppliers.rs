use northwind_application::{CreateSupplier, SupplierView, UpdateSupplier};
use northwind_domain::Supplier;
use serde::{Deserialize, Serialize};

use super::common::double_option;

/// Bare supplier record, used when attached as a relation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRecord {
    pub supplier_id: i32,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl From<Supplier> for SupplierRecord {
    fn from(supplier: Supplier) -> Self {
        Self {
            supplier_id: supplier.supplier_id(),
            company_name: supplier.company_name().to_owned(),
            contact_name: supplier.contact_name().map(str::to_owned),
            city: supplier.city().map(str::to_owned),
            country: supplier.country().map(str::to_owned),
            phone: supplier.phone().map(str::to_owned),
        }
    }
}

/// Supplier payload with its derived product count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierResponse {
    #[serde(flatten)]
    pub supplier: SupplierRecord,
    pub product_count: i64,
}

impl From<SupplierView> for SupplierResponse {
    fn from(view: SupplierView) -> Self {
        Self {
            supplier: SupplierRecord::from(view.supplier),
            product_count: view.product_count,
        }
    }
}

/// Create-supplier request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierRequest {
    pub company_name: String,
    pub contact_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl From<CreateSupplierRequest> for CreateSupplier {
    fn from(request: CreateSupplierRequest) -> Self {
        Self {
            company_name: request.company_name,
            contact_name: request.contact_name,
            city: request.city,
            country: request.country,
            phone: request.phone,
        }
    }
}

/// Partial update request body for a supplier.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplierRequest {
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
}

impl From<UpdateSupplierRequest> for UpdateSupplier {
    fn from(request: UpdateSupplierRequest) -> Self {
        Self {
            company_name: request.company_name,
            contact_name: request.contact_name,
            city: request.city,
            country: request.country,
            phone: request.phone,
        }
    }
}
