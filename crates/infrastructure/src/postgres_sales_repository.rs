use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use northwind_application::{
    CustomerRepository, DetailLine, NewOrderDetail, OrderRepository, QuerySpec, ShipperRepository,
};
use northwind_core::{AppError, AppResult};
use northwind_domain::{Customer, Order, OrderDetail, SchemaRegistry, Shipper};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::query::{count_query, page_query};
use crate::store_error::map_store_error;

mod customers;
mod orders;
mod shippers;

/// Postgres adapter for the sales ports: customers, orders, and shippers.
#[derive(Clone)]
pub struct PostgresSalesRepository {
    pool: PgPool,
    registry: Arc<SchemaRegistry>,
}

impl PostgresSalesRepository {
    /// Creates the adapter over a pooled connection set and the schema
    /// registry.
    pub fn new(pool: PgPool, registry: Arc<SchemaRegistry>) -> Self {
        Self { pool, registry }
    }
}
