use super::*;

const SELECT_SUPPLIERS: &str =
    "SELECT supplier_id, company_name, contact_name, city, country, phone FROM suppliers";

#[derive(sqlx::FromRow)]
struct SupplierRow {
    supplier_id: i32,
    company_name: String,
    contact_name: Option<String>,
    city: Option<String>,
    country: Option<String>,
    phone: Option<String>,
}

fn supplier_from_row(row: SupplierRow) -> AppResult<Supplier> {
    Supplier::new(
        row.supplier_id,
        row.company_name,
        row.contact_name,
        row.city,
        row.country,
        row.phone,
    )
}

#[async_trait]
impl SupplierRepository for PostgresCatalogRepository {
    async fn list_suppliers(&self, spec: &QuerySpec) -> AppResult<(Vec<Supplier>, i64)> {
        let schema = self.registry.schema("suppliers")?;

        let total: i64 = count_query(schema, spec)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to count suppliers", error))?;

        let rows = page_query(SELECT_SUPPLIERS, schema, spec)
            .build_query_as::<SupplierRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to list suppliers", error))?;

        let suppliers = rows
            .into_iter()
            .map(supplier_from_row)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((suppliers, total))
    }

    async fn find_supplier(&self, supplier_id: i32) -> AppResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "{SELECT_SUPPLIERS} WHERE supplier_id = $1"
        ))
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(&format!("failed to find supplier '{supplier_id}'"), error)
        })?;

        row.map(supplier_from_row).transpose()
    }

    async fn suppliers_by_ids(&self, supplier_ids: &[i32]) -> AppResult<Vec<Supplier>> {
        if supplier_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "{SELECT_SUPPLIERS} WHERE supplier_id = ANY($1) ORDER BY supplier_id"
        ))
        .bind(supplier_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to fetch suppliers by id", error))?;

        rows.into_iter().map(supplier_from_row).collect()
    }

    async fn insert_supplier(&self, supplier: &Supplier) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (company_name, contact_name, city, country, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING supplier_id, company_name, contact_name, city, country, phone
            "#,
        )
        .bind(supplier.company_name())
        .bind(supplier.contact_name())
        .bind(supplier.city())
        .bind(supplier.country())
        .bind(supplier.phone())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to insert supplier", error))?;

        supplier_from_row(row)
    }

    async fn update_supplier(&self, supplier: &Supplier) -> AppResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            UPDATE suppliers
            SET company_name = $2,
                contact_name = $3,
                city = $4,
                country = $5,
                phone = $6
            WHERE supplier_id = $1
            RETURNING supplier_id, company_name, contact_name, city, country, phone
            "#,
        )
        .bind(supplier.supplier_id())
        .bind(supplier.company_name())
        .bind(supplier.contact_name())
        .bind(supplier.city())
        .bind(supplier.country())
        .bind(supplier.phone())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(
                &format!("failed to update supplier '{}'", supplier.supplier_id()),
                error,
            )
        })?;

        row.map(supplier_from_row).transpose()
    }

    async fn product_counts(&self, supplier_ids: &[i32]) -> AppResult<Vec<(i32, i64)>> {
        if supplier_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT supplier_id, COUNT(*)
            FROM products
            WHERE supplier_id = ANY($1)
            GROUP BY supplier_id
            ORDER BY supplier_id
            "#,
        )
        .bind(supplier_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to count products per supplier", error))
    }

    async fn delete_supplier(&self, supplier_id: i32, detach_products: bool) -> AppResult<bool> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            map_store_error(
                &format!("failed to start delete transaction for supplier '{supplier_id}'"),
                error,
            )
        })?;

        if detach_products {
            sqlx::query("UPDATE products SET supplier_id = NULL WHERE supplier_id = $1")
                .bind(supplier_id)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    map_store_error(
                        &format!("failed to detach products from supplier '{supplier_id}'"),
                        error,
                    )
                })?;
        }

        let result = sqlx::query("DELETE FROM suppliers WHERE supplier_id = $1")
            .bind(supplier_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                map_store_error(&format!("failed to delete supplier '{supplier_id}'"), error)
            })?;

        transaction.commit().await.map_err(|error| {
            map_store_error(
                &format!("failed to commit delete transaction for supplier '{supplier_id}'"),
                error,
            )
        })?;

        Ok(result.rows_affected() > 0)
    }
}
