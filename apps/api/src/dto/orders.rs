use chrono::NaiveDate;
use northwind_application::{CreateOrder, DetailView, NewOrderDetail, OrderView, UpdateOrder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::double_option;
use super::customers::CustomerRecord;
use super::employees::EmployeeRecord;
use super::shippers::ShipperRecord;

/// One order line with its derived total.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailResponse {
    pub product_id: i32,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i16,
    pub discount: Decimal,
    pub line_total: Decimal,
}

impl From<DetailView> for OrderDetailResponse {
    fn from(view: DetailView) -> Self {
        Self {
            product_id: view.detail.product_id(),
            product_name: view.product_name,
            unit_price: view.detail.unit_price(),
            quantity: view.detail.quantity(),
            discount: view.detail.discount(),
            line_total: view.line_total,
        }
    }
}

/// Order payload with derived status and totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: i32,
    pub customer_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub order_date: Option<NaiveDate>,
    pub required_date: Option<NaiveDate>,
    pub shipped_date: Option<NaiveDate>,
    pub ship_via: Option<i32>,
    pub freight: Decimal,
    pub status: &'static str,
    pub subtotal: Decimal,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<EmployeeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipper: Option<ShipperRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<OrderDetailResponse>>,
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        Self {
            order_id: view.order.order_id(),
            customer_id: view.order.customer_id(),
            employee_id: view.order.employee_id(),
            order_date: view.order.order_date(),
            required_date: view.order.required_date(),
            shipped_date: view.order.shipped_date(),
            ship_via: view.order.ship_via(),
            freight: view.order.freight(),
            status: view.status.as_str(),
            subtotal: view.subtotal,
            total: view.total,
            customer: view.customer.map(CustomerRecord::from),
            employee: view.employee.map(EmployeeRecord::from),
            shipper: view.shipper.map(ShipperRecord::from),
            details: view.details.map(|details| {
                details.into_iter().map(OrderDetailResponse::from).collect()
            }),
        }
    }
}

/// One requested order line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailRequest {
    pub product_id: i32,
    pub unit_price: Option<Decimal>,
    pub quantity: i16,
    #[serde(default)]
    pub discount: Decimal,
}

impl From<OrderDetailRequest> for NewOrderDetail {
    fn from(request: OrderDetailRequest) -> Self {
        Self {
            product_id: request.product_id,
            unit_price: request.unit_price,
            quantity: request.quantity,
            discount: request.discount,
        }
    }
}

/// Create-order request body: the header plus at least one line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub order_date: Option<NaiveDate>,
    pub required_date: Option<NaiveDate>,
    pub shipped_date: Option<NaiveDate>,
    pub ship_via: Option<i32>,
    #[serde(default)]
    pub freight: Decimal,
    #[serde(default)]
    pub details: Vec<OrderDetailRequest>,
}

impl From<CreateOrderRequest> for CreateOrder {
    fn from(request: CreateOrderRequest) -> Self {
        Self {
            customer_id: request.customer_id,
            employee_id: request.employee_id,
            order_date: request.order_date,
            required_date: request.required_date,
            shipped_date: request.shipped_date,
            ship_via: request.ship_via,
            freight: request.freight,
            details: request.details.into_iter().map(NewOrderDetail::from).collect(),
        }
    }
}

/// Partial update request body for an order; supplying `details` replaces
/// every stored line.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub customer_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub employee_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub order_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub required_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub shipped_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub ship_via: Option<Option<i32>>,
    pub freight: Option<Decimal>,
    pub details: Option<Vec<OrderDetailRequest>>,
}

impl From<UpdateOrderRequest> for UpdateOrder {
    fn from(request: UpdateOrderRequest) -> Self {
        Self {
            customer_id: request.customer_id,
            employee_id: request.employee_id,
            order_date: request.order_date,
            required_date: request.required_date,
            shipped_date: request.shipped_date,
            ship_via: request.ship_via,
            freight: request.freight,
            details: request
                .details
                .map(|details| details.into_iter().map(NewOrderDetail::from).collect()),
        }
    }
}
