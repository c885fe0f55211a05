//! Sales services: customers, orders, and shippers.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use northwind_core::{AppError, AppResult, Violations};
use northwind_domain::{
    Customer, Employee, Order, OrderDetail, OrderStatus, SchemaRegistry, Shipper,
};
use rust_decimal::Decimal;

use crate::directory_ports::EmployeeRepository;
use crate::list_query::{Page, build_include_set, build_query_spec};
use crate::sales_ports::{
    CreateCustomer, CreateOrder, CreateShipper, CustomerRepository, NewOrderDetail,
    OrderRepository, ShipperRepository, UpdateCustomer, UpdateOrder, UpdateShipper,
};

mod customers;
mod orders;
mod shippers;

#[cfg(test)]
mod tests;

/// A customer plus the derived order count.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerView {
    /// The fetched row.
    pub customer: Customer,
    /// Number of orders placed by the customer.
    pub order_count: i64,
}

/// A shipper plus the derived order count.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipperView {
    /// The fetched row.
    pub shipper: Shipper,
    /// Number of orders carried by the shipper.
    pub order_count: i64,
}

/// One order line shaped for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    /// The stored line.
    pub detail: OrderDetail,
    /// Name of the referenced product.
    pub product_name: String,
    /// Derived discounted extended price.
    pub line_total: Decimal,
}

/// An order with derived fields and requested relations attached.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    /// The fetched header row.
    pub order: Order,
    /// Derived status on the request day.
    pub status: OrderStatus,
    /// Sum of discounted line totals.
    pub subtotal: Decimal,
    /// Subtotal plus freight.
    pub total: Decimal,
    /// Customer, when requested.
    pub customer: Option<Customer>,
    /// Employee, when requested.
    pub employee: Option<Employee>,
    /// Shipper, when requested.
    pub shipper: Option<Shipper>,
    /// Order lines, when requested.
    pub details: Option<Vec<DetailView>>,
}

/// Orchestrates sales reads and writes over the repository ports.
#[derive(Clone)]
pub struct SalesService {
    registry: Arc<SchemaRegistry>,
    customers: Arc<dyn CustomerRepository>,
    orders: Arc<dyn OrderRepository>,
    shippers: Arc<dyn ShipperRepository>,
    employees: Arc<dyn EmployeeRepository>,
}

impl SalesService {
    /// Creates the service over its ports.
    pub fn new(
        registry: Arc<SchemaRegistry>,
        customers: Arc<dyn CustomerRepository>,
        orders: Arc<dyn OrderRepository>,
        shippers: Arc<dyn ShipperRepository>,
        employees: Arc<dyn EmployeeRepository>,
    ) -> Self {
        Self {
            registry,
            customers,
            orders,
            shippers,
            employees,
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn distinct_ids(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    let mut ids: Vec<i32> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn index_by<T>(items: Vec<T>, key: impl Fn(&T) -> i32) -> BTreeMap<i32, T> {
    items.into_iter().map(|item| (key(&item), item)).collect()
}

fn count_for(counts: &[(i32, i64)], id: i32) -> i64 {
    counts
        .iter()
        .find(|(counted_id, _)| *counted_id == id)
        .map(|(_, count)| *count)
        .unwrap_or(0)
}

/// Validates requested order lines, reporting each bad line field.
fn check_detail_lines(details: &[NewOrderDetail], violations: &mut Violations) {
    for (index, detail) in details.iter().enumerate() {
        if detail.quantity < 1 {
            violations.push(format!("details[{index}].quantity"), "must be at least 1");
        }

        if detail.discount < Decimal::ZERO || detail.discount >= Decimal::ONE {
            violations.push(
                format!("details[{index}].discount"),
                "must be at least 0 and below 1",
            );
        }

        if let Some(price) = detail.unit_price
            && price < Decimal::ZERO
        {
            violations.push(
                format!("details[{index}].unitPrice"),
                "must not be negative",
            );
        }
    }
}
