//! Catalog services: products, categories, and suppliers.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use northwind_core::{AppError, AppResult};
use northwind_domain::{Category, Product, SchemaRegistry, StockStatus, Supplier};

use crate::catalog_ports::{
    CategoryRepository, CreateCategory, CreateProduct, CreateSupplier, ProductRepository,
    SupplierRepository, UpdateCategory, UpdateProduct, UpdateSupplier,
};
use crate::list_query::{Page, build_include_set, build_query_spec};

mod categories;
mod products;
mod suppliers;

#[cfg(test)]
mod tests;

/// A product with its derived fields and optional relations attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    /// The fetched row.
    pub product: Product,
    /// Derived stock classification.
    pub stock_status: StockStatus,
    /// Derived catalog health score.
    pub health_score: u8,
    /// Category, when the request asked for it.
    pub category: Option<Category>,
    /// Supplier, when the request asked for it.
    pub supplier: Option<Supplier>,
}

impl ProductView {
    fn from_parts(product: Product, category: Option<Category>, supplier: Option<Supplier>) -> Self {
        let stock_status = product.stock_status();
        let health_score = product.health_score();
        Self {
            product,
            stock_status,
            health_score,
            category,
            supplier,
        }
    }
}

/// A category plus its derived product count.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryView {
    /// The fetched row.
    pub category: Category,
    /// Number of products filed under the category.
    pub product_count: i64,
}

/// A supplier plus its derived product count.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierView {
    /// The fetched row.
    pub supplier: Supplier,
    /// Number of products sourced from the supplier.
    pub product_count: i64,
}

/// Orchestrates catalog reads and writes over the repository ports.
#[derive(Clone)]
pub struct CatalogService {
    registry: Arc<SchemaRegistry>,
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    suppliers: Arc<dyn SupplierRepository>,
}

impl CatalogService {
    /// Creates the service over its ports.
    pub fn new(
        registry: Arc<SchemaRegistry>,
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        suppliers: Arc<dyn SupplierRepository>,
    ) -> Self {
        Self {
            registry,
            products,
            categories,
            suppliers,
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
