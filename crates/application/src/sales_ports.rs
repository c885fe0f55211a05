//! Repository ports and write inputs for customers, orders, and shippers.

use async_trait::async_trait;
use chrono::NaiveDate;
use northwind_core::AppResult;
use northwind_domain::{Customer, Order, OrderDetail, Shipper};
use rust_decimal::Decimal;

use crate::QuerySpec;

/// Field values for a new customer.
#[derive(Debug, Clone)]
pub struct CreateCustomer {
    /// Company name, required.
    pub company_name: String,
    /// Contact person.
    pub contact_name: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
}

/// Partial customer update.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomer {
    /// New company name.
    pub company_name: Option<String>,
    /// New contact person.
    pub contact_name: Option<Option<String>>,
    /// New city.
    pub city: Option<Option<String>>,
    /// New country.
    pub country: Option<Option<String>>,
    /// New phone number.
    pub phone: Option<Option<String>>,
}

/// Field values for a new shipper.
#[derive(Debug, Clone)]
pub struct CreateShipper {
    /// Company name, required.
    pub company_name: String,
    /// Phone number.
    pub phone: Option<String>,
}

/// Partial shipper update.
#[derive(Debug, Clone, Default)]
pub struct UpdateShipper {
    /// New company name.
    pub company_name: Option<String>,
    /// New phone number.
    pub phone: Option<Option<String>>,
}

/// One requested order line. A missing unit price is captured from the
/// product's current price inside the write transaction.
#[derive(Debug, Clone)]
pub struct NewOrderDetail {
    /// Product reference.
    pub product_id: i32,
    /// Captured unit price; defaults to the product's current price.
    pub unit_price: Option<Decimal>,
    /// Ordered quantity.
    pub quantity: i16,
    /// Discount fraction.
    pub discount: Decimal,
}

/// Field values for a new order aggregate: the header row plus its lines,
/// written all-or-nothing.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// Customer reference.
    pub customer_id: Option<i32>,
    /// Employee reference.
    pub employee_id: Option<i32>,
    /// Order date.
    pub order_date: Option<NaiveDate>,
    /// Required delivery date.
    pub required_date: Option<NaiveDate>,
    /// Shipped date.
    pub shipped_date: Option<NaiveDate>,
    /// Shipper reference.
    pub ship_via: Option<i32>,
    /// Freight charge.
    pub freight: Decimal,
    /// Order lines; at least one is required.
    pub details: Vec<NewOrderDetail>,
}

/// Partial order update. Supplying `details` replaces every line in the
/// same transaction as the header update.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrder {
    /// New customer reference.
    pub customer_id: Option<Option<i32>>,
    /// New employee reference.
    pub employee_id: Option<Option<i32>>,
    /// New order date.
    pub order_date: Option<Option<NaiveDate>>,
    /// New required delivery date.
    pub required_date: Option<Option<NaiveDate>>,
    /// New shipped date.
    pub shipped_date: Option<Option<NaiveDate>>,
    /// New shipper reference.
    pub ship_via: Option<Option<i32>>,
    /// New freight charge.
    pub freight: Option<Decimal>,
    /// Replacement order lines.
    pub details: Option<Vec<NewOrderDetail>>,
}

/// An order line joined with its product name for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailLine {
    /// The stored line.
    pub detail: OrderDetail,
    /// Name of the referenced product.
    pub product_name: String,
}

/// Customer persistence port.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Fetches one page of customers plus the total count.
    async fn list_customers(&self, spec: &QuerySpec) -> AppResult<(Vec<Customer>, i64)>;

    /// Finds a customer by identifier.
    async fn find_customer(&self, customer_id: i32) -> AppResult<Option<Customer>>;

    /// Fetches customers by identifier set.
    async fn customers_by_ids(&self, customer_ids: &[i32]) -> AppResult<Vec<Customer>>;

    /// Inserts a validated customer.
    async fn insert_customer(&self, customer: &Customer) -> AppResult<Customer>;

    /// Overwrites a customer row from a validated entity.
    async fn update_customer(&self, customer: &Customer) -> AppResult<Option<Customer>>;

    /// Counts orders per customer for a page of customers, in one grouped
    /// query.
    async fn order_counts(&self, customer_ids: &[i32]) -> AppResult<Vec<(i32, i64)>>;

    /// Deletes a customer, optionally detaching their orders first.
    async fn delete_customer(&self, customer_id: i32, detach_orders: bool) -> AppResult<bool>;
}

/// Order persistence port. Creates, updates, and deletes cover the whole
/// aggregate inside one store transaction.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetches one page of orders plus the total count.
    async fn list_orders(&self, spec: &QuerySpec) -> AppResult<(Vec<Order>, i64)>;

    /// Finds an order header by identifier.
    async fn find_order(&self, order_id: i32) -> AppResult<Option<Order>>;

    /// Writes the order header and its lines atomically; missing line
    /// prices are captured from the products inside the transaction.
    async fn create_order(
        &self,
        order: &Order,
        details: &[NewOrderDetail],
    ) -> AppResult<(Order, Vec<OrderDetail>)>;

    /// Updates the header and, when lines are supplied, replaces them in
    /// the same transaction. Returns `None` when the order is missing.
    async fn update_order(
        &self,
        order: &Order,
        details: Option<&[NewOrderDetail]>,
    ) -> AppResult<Option<(Order, Vec<OrderDetail>)>>;

    /// Deletes the order and its lines atomically. Returns whether a row
    /// was deleted.
    async fn delete_order(&self, order_id: i32) -> AppResult<bool>;

    /// Fetches the lines for a set of orders, joined with product names.
    async fn details_for_orders(&self, order_ids: &[i32]) -> AppResult<Vec<DetailLine>>;

    /// Computes discounted subtotals per order in one grouped query,
    /// pushed to the store rather than summed in memory.
    async fn subtotals(&self, order_ids: &[i32]) -> AppResult<Vec<(i32, Decimal)>>;
}

/// Shipper persistence port.
#[async_trait]
pub trait ShipperRepository: Send + Sync {
    /// Fetches one page of shippers plus the total count.
    async fn list_shippers(&self, spec: &QuerySpec) -> AppResult<(Vec<Shipper>, i64)>;

    /// Finds a shipper by identifier.
    async fn find_shipper(&self, shipper_id: i32) -> AppResult<Option<Shipper>>;

    /// Fetches shippers by identifier set.
    async fn shippers_by_ids(&self, shipper_ids: &[i32]) -> AppResult<Vec<Shipper>>;

    /// Inserts a validated shipper.
    async fn insert_shipper(&self, shipper: &Shipper) -> AppResult<Shipper>;

    /// Overwrites a shipper row from a validated entity.
    async fn update_shipper(&self, shipper: &Shipper) -> AppResult<Option<Shipper>>;

    /// Counts orders per shipper.
    async fn order_counts(&self, shipper_ids: &[i32]) -> AppResult<Vec<(i32, i64)>>;

    /// Deletes a shipper, optionally detaching their orders first.
    async fn delete_shipper(&self, shipper_id: i32, detach_orders: bool) -> AppResult<bool>;
}
