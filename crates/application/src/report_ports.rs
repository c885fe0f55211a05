//! Repository port for cross-entity aggregate reports.
//!
//! Every aggregation here is pushed to the store; the service never pulls
//! raw rows to sum in memory. Rankings carry a secondary ascending-id sort
//! so ties come back in a stable order.

use async_trait::async_trait;
use northwind_core::AppResult;
use rust_decimal::Decimal;

/// One customer ranked by lifetime spend.
#[derive(Debug, Clone, PartialEq)]
pub struct TopCustomerRow {
    /// Customer identifier.
    pub customer_id: i32,
    /// Company name.
    pub company_name: String,
    /// Number of orders placed.
    pub order_count: i64,
    /// Discounted spend across all order lines.
    pub total_spend: Decimal,
}

/// Revenue grouped by product category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySalesRow {
    /// Category identifier.
    pub category_id: i32,
    /// Category name.
    pub category_name: String,
    /// Units sold.
    pub units_sold: i64,
    /// Discounted revenue.
    pub revenue: Decimal,
}

/// Revenue grouped by order year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlySalesRow {
    /// Calendar year of the order date.
    pub year: i32,
    /// Number of orders placed that year.
    pub order_count: i64,
    /// Discounted revenue for the year.
    pub revenue: Decimal,
}

/// Catalog statistics grouped by supplier.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierStatsRow {
    /// Supplier identifier.
    pub supplier_id: i32,
    /// Company name.
    pub company_name: String,
    /// Number of products sourced from the supplier.
    pub product_count: i64,
    /// Total units on hand across those products.
    pub units_in_stock: i64,
    /// Average unit price, when any product has a price.
    pub average_unit_price: Option<Decimal>,
}

/// Aggregate reporting port.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Ranks customers by discounted spend, ties broken by ascending
    /// customer id.
    async fn top_customers(&self, limit: i64) -> AppResult<Vec<TopCustomerRow>>;

    /// Sums revenue per category, optionally restricted to one order year.
    async fn sales_by_category(&self, year: Option<i32>) -> AppResult<Vec<CategorySalesRow>>;

    /// Sums revenue and order counts per order year.
    async fn sales_by_year(&self) -> AppResult<Vec<YearlySalesRow>>;

    /// Computes per-supplier catalog statistics.
    async fn supplier_stats(&self) -> AppResult<Vec<SupplierStatsRow>>;
}
