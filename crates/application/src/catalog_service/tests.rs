use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use northwind_core::{AppError, AppResult};
use northwind_domain::{Category, Product, SchemaRegistry, StockStatus, Supplier};
use rust_decimal_macros::dec;
use tokio::sync::Mutex;

use crate::catalog_ports::{
    CategoryRepository, CreateCategory, CreateProduct, ProductRepository, SupplierRepository,
    UpdateProduct,
};
use crate::list_query::QuerySpec;

use super::CatalogService;

#[derive(Default)]
struct FakeProductRepository {
    products: Mutex<Vec<Product>>,
    order_line_counts: Mutex<BTreeMap<i32, i64>>,
}

#[async_trait]
impl ProductRepository for FakeProductRepository {
    async fn list_products(&self, _spec: &QuerySpec) -> AppResult<(Vec<Product>, i64)> {
        let products = self.products.lock().await;
        Ok((products.clone(), products.len() as i64))
    }

    async fn find_product(&self, product_id: i32) -> AppResult<Option<Product>> {
        let products = self.products.lock().await;
        Ok(products
            .iter()
            .find(|product| product.product_id() == product_id)
            .cloned())
    }

    async fn insert_product(&self, product: &Product) -> AppResult<Product> {
        let mut products = self.products.lock().await;
        let next_id = products
            .iter()
            .map(Product::product_id)
            .max()
            .unwrap_or(0)
            + 1;
        let stored = Product::new(
            next_id,
            product.product_name(),
            product.supplier_id(),
            product.category_id(),
            product.quantity_per_unit().map(str::to_owned),
            product.unit_price(),
            product.units_in_stock(),
            product.units_on_order(),
            product.reorder_level(),
            product.discontinued(),
        )?;
        products.push(stored.clone());
        Ok(stored)
    }

    async fn update_product(&self, product: &Product) -> AppResult<Option<Product>> {
        let mut products = self.products.lock().await;
        let Some(slot) = products
            .iter_mut()
            .find(|stored| stored.product_id() == product.product_id())
        else {
            return Ok(None);
        };
        *slot = product.clone();
        Ok(Some(product.clone()))
    }

    async fn count_order_lines(&self, product_id: i32) -> AppResult<i64> {
        Ok(self
            .order_line_counts
            .lock()
            .await
            .get(&product_id)
            .copied()
            .unwrap_or(0))
    }

    async fn delete_product(&self, product_id: i32, _cascade: bool) -> AppResult<bool> {
        let mut products = self.products.lock().await;
        let before = products.len();
        products.retain(|product| product.product_id() != product_id);
        Ok(products.len() < before)
    }
}

#[derive(Default)]
struct FakeCategoryRepository {
    categories: Mutex<Vec<Category>>,
    product_counts: Mutex<BTreeMap<i32, i64>>,
}

#[async_trait]
impl CategoryRepository for FakeCategoryRepository {
    async fn list_categories(&self, _spec: &QuerySpec) -> AppResult<(Vec<Category>, i64)> {
        let categories = self.categories.lock().await;
        Ok((categories.clone(), categories.len() as i64))
    }

    async fn find_category(&self, category_id: i32) -> AppResult<Option<Category>> {
        let categories = self.categories.lock().await;
        Ok(categories
            .iter()
            .find(|category| category.category_id() == category_id)
            .cloned())
    }

    async fn categories_by_ids(&self, category_ids: &[i32]) -> AppResult<Vec<Category>> {
        let categories = self.categories.lock().await;
        Ok(categories
            .iter()
            .filter(|category| category_ids.contains(&category.category_id()))
            .cloned()
            .collect())
    }

    async fn insert_category(&self, category: &Category) -> AppResult<Category> {
        let mut categories = self.categories.lock().await;
        if categories
            .iter()
            .any(|stored| stored.category_name() == category.category_name())
        {
            return Err(AppError::DuplicateKey(format!(
                "category name '{}' already exists",
                category.category_name()
            )));
        }

        let next_id = categories
            .iter()
            .map(Category::category_id)
            .max()
            .unwrap_or(0)
            + 1;
        let stored = Category::new(
            next_id,
            category.category_name(),
            category.description().map(str::to_owned),
        )?;
        categories.push(stored.clone());
        Ok(stored)
    }

    async fn update_category(&self, category: &Category) -> AppResult<Option<Category>> {
        let mut categories = self.categories.lock().await;
        let Some(slot) = categories
            .iter_mut()
            .find(|stored| stored.category_id() == category.category_id())
        else {
            return Ok(None);
        };
        *slot = category.clone();
        Ok(Some(category.clone()))
    }

    async fn product_counts(&self, category_ids: &[i32]) -> AppResult<Vec<(i32, i64)>> {
        let counts = self.product_counts.lock().await;
        Ok(category_ids
            .iter()
            .filter_map(|id| counts.get(id).map(|count| (*id, *count)))
            .collect())
    }

    async fn delete_category(&self, category_id: i32, _detach: bool) -> AppResult<bool> {
        let mut categories = self.categories.lock().await;
        let before = categories.len();
        categories.retain(|category| category.category_id() != category_id);
        Ok(categories.len() < before)
    }
}

#[derive(Default)]
struct FakeSupplierRepository {
    suppliers: Mutex<Vec<Supplier>>,
}

#[async_trait]
impl SupplierRepository for FakeSupplierRepository {
    async fn list_suppliers(&self, _spec: &QuerySpec) -> AppResult<(Vec<Supplier>, i64)> {
        let suppliers = self.suppliers.lock().await;
        Ok((suppliers.clone(), suppliers.len() as i64))
    }

    async fn find_supplier(&self, supplier_id: i32) -> AppResult<Option<Supplier>> {
        let suppliers = self.suppliers.lock().await;
        Ok(suppliers
            .iter()
            .find(|supplier| supplier.supplier_id() == supplier_id)
            .cloned())
    }

    async fn suppliers_by_ids(&self, supplier_ids: &[i32]) -> AppResult<Vec<Supplier>> {
        let suppliers = self.suppliers.lock().await;
        Ok(suppliers
            .iter()
            .filter(|supplier| supplier_ids.contains(&supplier.supplier_id()))
            .cloned()
            .collect())
    }

    async fn insert_supplier(&self, supplier: &Supplier) -> AppResult<Supplier> {
        let mut suppliers = self.suppliers.lock().await;
        let next_id = suppliers
            .iter()
            .map(Supplier::supplier_id)
            .max()
            .unwrap_or(0)
            + 1;
        let stored = Supplier::new(
            next_id,
            supplier.company_name(),
            supplier.contact_name().map(str::to_owned),
            supplier.city().map(str::to_owned),
            supplier.country().map(str::to_owned),
            supplier.phone().map(str::to_owned),
        )?;
        suppliers.push(stored.clone());
        Ok(stored)
    }

    async fn update_supplier(&self, supplier: &Supplier) -> AppResult<Option<Supplier>> {
        let mut suppliers = self.suppliers.lock().await;
        let Some(slot) = suppliers
            .iter_mut()
            .find(|stored| stored.supplier_id() == supplier.supplier_id())
        else {
            return Ok(None);
        };
        *slot = supplier.clone();
        Ok(Some(supplier.clone()))
    }

    async fn product_counts(&self, _supplier_ids: &[i32]) -> AppResult<Vec<(i32, i64)>> {
        Ok(Vec::new())
    }

    async fn delete_supplier(&self, supplier_id: i32, _detach: bool) -> AppResult<bool> {
        let mut suppliers = self.suppliers.lock().await;
        let before = suppliers.len();
        suppliers.retain(|supplier| supplier.supplier_id() != supplier_id);
        Ok(suppliers.len() < before)
    }
}

struct Fixture {
    service: CatalogService,
    products: Arc<FakeProductRepository>,
    categories: Arc<FakeCategoryRepository>,
}

async fn fixture() -> Fixture {
    let products = Arc::new(FakeProductRepository::default());
    let categories = Arc::new(FakeCategoryRepository::default());
    let suppliers = Arc::new(FakeSupplierRepository::default());

    categories.categories.lock().await.push(
        Category::new(1, "Beverages", None).unwrap_or_else(|_| unreachable!()),
    );
    suppliers.suppliers.lock().await.push(
        Supplier::new(
            1,
            "Exotic Liquids",
            Some("Charlotte Cooper".to_owned()),
            Some("London".to_owned()),
            Some("UK".to_owned()),
            None,
        )
        .unwrap_or_else(|_| unreachable!()),
    );
    products.products.lock().await.push(
        Product::new(
            1,
            "Chai",
            Some(1),
            Some(1),
            Some("10 boxes x 20 bags".to_owned()),
            Some(dec!(18.00)),
            5,
            0,
            0,
            false,
        )
        .unwrap_or_else(|_| unreachable!()),
    );

    let service = CatalogService::new(
        Arc::new(SchemaRegistry::northwind()),
        products.clone(),
        categories.clone(),
        suppliers.clone(),
    );

    Fixture {
        service,
        products,
        categories,
    }
}

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

#[tokio::test]
async fn list_products_attaches_derived_fields_and_requested_relations() {
    let fixture = fixture().await;
    let page = fixture
        .service
        .list_products(&params(&[
            ("includeCategory", "true"),
            ("includeSupplier", "true"),
        ]))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.total(), 1);
    let view = &page.items()[0];
    assert_eq!(view.stock_status, StockStatus::LowStock);
    assert_eq!(view.health_score, 75);
    assert!(view.category.is_some());
    assert!(view.supplier.is_some());
}

#[tokio::test]
async fn relations_stay_detached_unless_requested() {
    let fixture = fixture().await;
    let page = fixture
        .service
        .list_products(&params(&[]))
        .await
        .unwrap_or_else(|_| unreachable!());

    let view = &page.items()[0];
    assert!(view.category.is_none());
    assert!(view.supplier.is_none());
}

#[tokio::test]
async fn get_product_maps_missing_rows_to_not_found() {
    let fixture = fixture().await;
    let result = fixture.service.get_product(999, &params(&[])).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn create_product_rejects_invalid_bodies_before_any_write() {
    let fixture = fixture().await;
    let result = fixture
        .service
        .create_product(CreateProduct {
            product_name: "  ".to_owned(),
            supplier_id: None,
            category_id: None,
            quantity_per_unit: None,
            unit_price: Some(dec!(-3)),
            units_in_stock: 0,
            units_on_order: 0,
            reorder_level: 0,
            discontinued: false,
        })
        .await;

    match result {
        Err(AppError::Validation(violations)) => assert_eq!(violations.len(), 2),
        _ => panic!("expected a validation failure"),
    }
    assert_eq!(fixture.products.products.lock().await.len(), 1);
}

#[tokio::test]
async fn update_product_merges_the_patch_over_stored_values() {
    let fixture = fixture().await;
    let view = fixture
        .service
        .update_product(
            1,
            UpdateProduct {
                unit_price: Some(Some(dec!(20.00))),
                ..UpdateProduct::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(view.product.product_name(), "Chai");
    assert_eq!(view.product.unit_price(), Some(dec!(20.00)));
}

#[tokio::test]
async fn delete_product_reports_the_exact_dependent_count() {
    let fixture = fixture().await;
    fixture
        .products
        .order_line_counts
        .lock()
        .await
        .insert(1, 3);

    let result = fixture.service.delete_product(1, false).await;
    match result {
        Err(AppError::DependencyConflict { dependents, .. }) => assert_eq!(dependents, 3),
        _ => panic!("expected a dependency conflict"),
    }

    // Force cascades the order lines and the delete goes through.
    let result = fixture.service.delete_product(1, true).await;
    assert!(result.is_ok());
    assert!(fixture.products.products.lock().await.is_empty());
}

#[tokio::test]
async fn duplicate_category_names_surface_as_duplicate_key() {
    let fixture = fixture().await;
    let result = fixture
        .service
        .create_category(CreateCategory {
            category_name: "Beverages".to_owned(),
            description: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::DuplicateKey(_))));
}

#[tokio::test]
async fn delete_category_with_products_requires_force() {
    let fixture = fixture().await;
    fixture
        .categories
        .product_counts
        .lock()
        .await
        .insert(1, 12);

    let result = fixture.service.delete_category(1, false).await;
    match result {
        Err(AppError::DependencyConflict { dependents, .. }) => assert_eq!(dependents, 12),
        _ => panic!("expected a dependency conflict"),
    }

    assert!(fixture.service.delete_category(1, true).await.is_ok());
}
