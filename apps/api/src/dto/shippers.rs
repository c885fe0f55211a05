use northwind_application::{CreateShipper, ShipperView, UpdateShipper};
use northwind_domain::Shipper;
use serde::{Deserialize, Serialize};

use super::common::double_option;

/// Bare shipper record, used when attached as a relation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipperRecord {
    pub shipper_id: i32,
    pub company_name: String,
    pub phone: Option<String>,
}

impl From<Shipper> for ShipperRecord {
    fn from(shipper: Shipper) -> Self {
        Self {
            shipper_id: shipper.shipper_id(),
            company_name: shipper.company_name().to_owned(),
            phone: shipper.phone().map(str::to_owned),
        }
    }
}

/// Shipper payload with its derived order count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipperResponse {
    #[serde(flatten)]
    pub shipper: ShipperRecord,
    pub order_count: i64,
}

impl From<ShipperView> for ShipperResponse {
    fn from(view: ShipperView) -> Self {
        Self {
            shipper: ShipperRecord::from(view.shipper),
            order_count: view.order_count,
        }
    }
}

/// Create-shipper request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipperRequest {
    pub company_name: String,
    pub phone: Option<String>,
}

impl From<CreateShipperRequest> for CreateShipper {
    fn from(request: CreateShipperRequest) -> Self {
        Self {
            company_name: request.company_name,
            phone: request.phone,
        }
    }
}

/// Partial update request body for a shipper.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipperRequest {
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
}

impl From<UpdateShipperRequest> for UpdateShipper {
    fn from(request: UpdateShipperRequest) -> Self {
        Self {
            company_name: request.company_name,
            phone: request.phone,
        }
    }
}
