use super::*;

const SELECT_PRODUCTS: &str = "SELECT product_id, product_name, supplier_id, category_id, \
     quantity_per_unit, unit_price, units_in_stock, units_on_order, reorder_level, discontinued \
     FROM products";

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: i32,
    product_name: String,
    supplier_id: Option<i32>,
    category_id: Option<i32>,
    quantity_per_unit: Option<String>,
    unit_price: Option<Decimal>,
    units_in_stock: i16,
    units_on_order: i16,
    reorder_level: i16,
    discontinued: bool,
}

fn product_from_row(row: ProductRow) -> AppResult<Product> {
    Product::new(
        row.product_id,
        row.product_name,
        row.supplier_id,
        row.category_id,
        row.quantity_per_unit,
        row.unit_price,
        row.units_in_stock,
        row.units_on_order,
        row.reorder_level,
        row.discontinued,
    )
}

#[async_trait]
impl ProductRepository for PostgresCatalogRepository {
    async fn list_products(&self, spec: &QuerySpec) -> AppResult<(Vec<Product>, i64)> {
        let schema = self.registry.schema("products")?;

        let total: i64 = count_query(schema, spec)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to count products", error))?;

        let rows = page_query(SELECT_PRODUCTS, schema, spec)
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to list products", error))?;

        let products = rows
            .into_iter()
            .map(product_from_row)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((products, total))
    }

    async fn find_product(&self, product_id: i32) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCTS} WHERE product_id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(&format!("failed to find product '{product_id}'"), error)
        })?;

        row.map(product_from_row).transpose()
    }

    async fn insert_product(&self, product: &Product) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (product_name, supplier_id, category_id, quantity_per_unit,
                                  unit_price, units_in_stock, units_on_order, reorder_level,
                                  discontinued)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING product_id, product_name, supplier_id, category_id, quantity_per_unit,
                      unit_price, units_in_stock, units_on_order, reorder_level, discontinued
            "#,
        )
        .bind(product.product_name())
        .bind(product.supplier_id())
        .bind(product.category_id())
        .bind(product.quantity_per_unit())
        .bind(product.unit_price())
        .bind(product.units_in_stock())
        .bind(product.units_on_order())
        .bind(product.reorder_level())
        .bind(product.discontinued())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to insert product", error))?;

        product_from_row(row)
    }

    async fn update_product(&self, product: &Product) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET product_name = $2,
                supplier_id = $3,
                category_id = $4,
                quantity_per_unit = $5,
                unit_price = $6,
                units_in_stock = $7,
                units_on_order = $8,
                reorder_level = $9,
                discontinued = $10
            WHERE product_id = $1
            RETURNING product_id, product_name, supplier_id, category_id, quantity_per_unit,
                      unit_price, units_in_stock, units_on_order, reorder_level, discontinued
            "#,
        )
        .bind(product.product_id())
        .bind(product.product_name())
        .bind(product.supplier_id())
        .bind(product.category_id())
        .bind(product.quantity_per_unit())
        .bind(product.unit_price())
        .bind(product.units_in_stock())
        .bind(product.units_on_order())
        .bind(product.reorder_level())
        .bind(product.discontinued())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(
                &format!("failed to update product '{}'", product.product_id()),
                error,
            )
        })?;

        row.map(product_from_row).transpose()
    }

    async fn count_order_lines(&self, product_id: i32) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM order_details WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(
                &format!("failed to count order lines for product '{product_id}'"),
                error,
            )
        })
    }

    async fn delete_product(&self, product_id: i32, cascade_order_lines: bool) -> AppResult<bool> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            map_store_error(
                &format!("failed to start delete transaction for product '{product_id}'"),
                error,
            )
        })?;

        if cascade_order_lines {
            sqlx::query("DELETE FROM order_details WHERE product_id = $1")
                .bind(product_id)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    map_store_error(
                        &format!("failed to cascade order lines for product '{product_id}'"),
                        error,
                    )
                })?;
        }

        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                map_store_error(&format!("failed to delete product '{product_id}'"), error)
            })?;

        transaction.commit().await.map_err(|error| {
            map_store_error(
                &format!("failed to commit delete transaction for product '{product_id}'"),
                error,
            )
        })?;

        Ok(result.rows_affected() > 0)
    }
}
