use super::*;

const SELECT_CATEGORIES: &str =
    "SELECT category_id, category_name, description FROM categories";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    category_id: i32,
    category_name: String,
    description: Option<String>,
}

fn category_from_row(row: CategoryRow) -> AppResult<Category> {
    Category::new(row.category_id, row.category_name, row.description)
}

#[async_trait]
impl CategoryRepository for PostgresCatalogRepository {
    async fn list_categories(&self, spec: &QuerySpec) -> AppResult<(Vec<Category>, i64)> {
        let schema = self.registry.schema("categories")?;

        let total: i64 = count_query(schema, spec)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to count categories", error))?;

        let rows = page_query(SELECT_CATEGORIES, schema, spec)
            .build_query_as::<CategoryRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to list categories", error))?;

        let categories = rows
            .into_iter()
            .map(category_from_row)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((categories, total))
    }

    async fn find_category(&self, category_id: i32) -> AppResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "{SELECT_CATEGORIES} WHERE category_id = $1"
        ))
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(&format!("failed to find category '{category_id}'"), error)
        })?;

        row.map(category_from_row).transpose()
    }

    async fn categories_by_ids(&self, category_ids: &[i32]) -> AppResult<Vec<Category>> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "{SELECT_CATEGORIES} WHERE category_id = ANY($1) ORDER BY category_id"
        ))
        .bind(category_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to fetch categories by id", error))?;

        rows.into_iter().map(category_from_row).collect()
    }

    async fn insert_category(&self, category: &Category) -> AppResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (category_name, description)
            VALUES ($1, $2)
            RETURNING category_id, category_name, description
            "#,
        )
        .bind(category.category_name())
        .bind(category.description())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to insert category", error))?;

        category_from_row(row)
    }

    async fn update_category(&self, category: &Category) -> AppResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories
            SET category_name = $2,
                description = $3
            WHERE category_id = $1
            RETURNING category_id, category_name, description
            "#,
        )
        .bind(category.category_id())
        .bind(category.category_name())
        .bind(category.description())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(
                &format!("failed to update category '{}'", category.category_id()),
                error,
            )
        })?;

        row.map(category_from_row).transpose()
    }

    async fn product_counts(&self, category_ids: &[i32]) -> AppResult<Vec<(i32, i64)>> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT category_id, COUNT(*)
            FROM products
            WHERE category_id = ANY($1)
            GROUP BY category_id
            ORDER BY category_id
            "#,
        )
        .bind(category_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to count products per category", error))
    }

    async fn delete_category(&self, category_id: i32, detach_products: bool) -> AppResult<bool> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            map_store_error(
                &format!("failed to start delete transaction for category '{category_id}'"),
                error,
            )
        })?;

        if detach_products {
            sqlx::query("UPDATE products SET category_id = NULL WHERE category_id = $1")
                .bind(category_id)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    map_store_error(
                        &format!("failed to detach products from category '{category_id}'"),
                        error,
                    )
                })?;
        }

        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(category_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                map_store_error(&format!("failed to delete category '{category_id}'"), error)
            })?;

        transaction.commit().await.map_err(|error| {
            map_store_error(
                &format!("failed to commit delete transaction for category '{category_id}'"),
                error,
            )
        })?;

        Ok(result.rows_affected() > 0)
    }
}
