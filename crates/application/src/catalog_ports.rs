//! Repository ports and write inputs for the product catalog.

use async_trait::async_trait;
use northwind_core::AppResult;
use northwind_domain::{Category, Product, Supplier};
use rust_decimal::Decimal;

use crate::QuerySpec;

/// Field values for a new product.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    /// Product name, required.
    pub product_name: String,
    /// Supplier reference.
    pub supplier_id: Option<i32>,
    /// Category reference.
    pub category_id: Option<i32>,
    /// Packaging description.
    pub quantity_per_unit: Option<String>,
    /// Unit price.
    pub unit_price: Option<Decimal>,
    /// Units on hand.
    pub units_in_stock: i16,
    /// Units currently on order.
    pub units_on_order: i16,
    /// Reorder threshold.
    pub reorder_level: i16,
    /// Discontinued flag.
    pub discontinued: bool,
}

/// Partial product update; absent fields keep their stored value, a
/// double-wrapped `None` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    /// New product name.
    pub product_name: Option<String>,
    /// New supplier reference.
    pub supplier_id: Option<Option<i32>>,
    /// New category reference.
    pub category_id: Option<Option<i32>>,
    /// New packaging description.
    pub quantity_per_unit: Option<Option<String>>,
    /// New unit price.
    pub unit_price: Option<Option<Decimal>>,
    /// New units on hand.
    pub units_in_stock: Option<i16>,
    /// New units on order.
    pub units_on_order: Option<i16>,
    /// New reorder threshold.
    pub reorder_level: Option<i16>,
    /// New discontinued flag.
    pub discontinued: Option<bool>,
}

/// Field values for a new category.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    /// Unique category name, required.
    pub category_name: String,
    /// Free-text description.
    pub description: Option<String>,
}

/// Partial category update.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    /// New category name.
    pub category_name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
}

/// Field values for a new supplier.
#[derive(Debug, Clone)]
pub struct CreateSupplier {
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

/// Partial supplier update.
#[derive(Debug, Clone, Default)]
pub struct UpdateSupplier {
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

/// Product persistence port.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetches one page of products plus the total count under the same
    /// filters.
    async fn list_products(&self, spec: &QuerySpec) -> AppResult<(Vec<Product>, i64)>;

    /// Finds a product by identifier.
    async fn find_product(&self, product_id: i32) -> AppResult<Option<Product>>;

    /// Inserts a validated product; the identifier on the argument is
    /// ignored and assigned by the store.
    async fn insert_product(&self, product: &Product) -> AppResult<Product>;

    /// Overwrites a product row from a validated entity. Returns `None`
    /// when the row no longer exists.
    async fn update_product(&self, product: &Product) -> AppResult<Option<Product>>;

    /// Counts order lines referencing a product.
    async fn count_order_lines(&self, product_id: i32) -> AppResult<i64>;

    /// Deletes a product, optionally cascading its order lines in the same
    /// transaction. Returns whether a row was deleted.
    async fn delete_product(&self, product_id: i32, cascade_order_lines: bool) -> AppResult<bool>;
}

/// Category persistence port.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Fetches one page of categories plus the total count.
    async fn list_categories(&self, spec: &QuerySpec) -> AppResult<(Vec<Category>, i64)>;

    /// Finds a category by identifier.
    async fn find_category(&self, category_id: i32) -> AppResult<Option<Category>>;

    /// Fetches categories by identifier set.
    async fn categories_by_ids(&self, category_ids: &[i32]) -> AppResult<Vec<Category>>;

    /// Inserts a validated category.
    async fn insert_category(&self, category: &Category) -> AppResult<Category>;

    /// Overwrites a category row from a validated entity.
    async fn update_category(&self, category: &Category) -> AppResult<Option<Category>>;

    /// Counts products per category for a page of categories, in one
    /// grouped query.
    async fn product_counts(&self, category_ids: &[i32]) -> AppResult<Vec<(i32, i64)>>;

    /// Deletes a category, optionally detaching its products first.
    /// Returns whether a row was deleted.
    async fn delete_category(&self, category_id: i32, detach_products: bool) -> AppResult<bool>;
}

/// Supplier persistence port.
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    /// Fetches one page of suppliers plus the total count.
    async fn list_suppliers(&self, spec: &QuerySpec) -> AppResult<(Vec<Supplier>, i64)>;

    /// Finds a supplier by identifier.
    async fn find_supplier(&self, supplier_id: i32) -> AppResult<Option<Supplier>>;

    /// Fetches suppliers by identifier set.
    async fn suppliers_by_ids(&self, supplier_ids: &[i32]) -> AppResult<Vec<Supplier>>;

    /// Inserts a validated supplier.
    async fn insert_supplier(&self, supplier: &Supplier) -> AppResult<Supplier>;

    /// Overwrites a supplier row from a validated entity.
    async fn update_supplier(&self, supplier: &Supplier) -> AppResult<Option<Supplier>>;

    /// Counts products per supplier for a page of suppliers.
    async fn product_counts(&self, supplier_ids: &[i32]) -> AppResult<Vec<(i32, i64)>>;

    /// Deletes a supplier, optionally detaching its products first.
    async fn delete_supplier(&self, supplier_id: i32, detach_products: bool) -> AppResult<bool>;
}
