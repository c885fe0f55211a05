use std::sync::Arc;

use async_trait::async_trait;
use northwind_application::{CategoryRepository, ProductRepository, QuerySpec, SupplierRepository};
use northwind_core::AppResult;
use northwind_domain::{Category, Product, SchemaRegistry, Supplier};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::query::{count_query, page_query};
use crate::store_error::map_store_error;

mod categories;
mod products;
mod suppliers;

/// Postgres adapter for the catalog ports: products, categories, and
/// suppliers.
#[derive(Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
    registry: Arc<SchemaRegistry>,
}

impl PostgresCatalogRepository {
    /// Creates the adapter over a pooled connection set and the schema
    /// registry.
    pub fn new(pool: PgPool, registry: Arc<SchemaRegistry>) -> Self {
        Self { pool, registry }
    }
}
