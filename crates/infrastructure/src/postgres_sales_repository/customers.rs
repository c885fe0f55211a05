use super::*;

const SELECT_CUSTOMERS: &str =
    "SELECT customer_id, company_name, contact_name, city, country, phone FROM customers";

#[derive(sqlx::FromRow)]
struct CustomerRow {
    customer_id: i32,
    company_name: String,
    contact_name: Option<String>,
    city: Option<String>,
    country: Option<String>,
    phone: Option<String>,
}

fn customer_from_row(row: CustomerRow) -> AppResult<Customer> {
    Customer::new(
        row.customer_id,
        row.company_name,
        row.contact_name,
        row.city,
        row.country,
        row.phone,
    )
}

#[async_trait]
impl CustomerRepository for PostgresSalesRepository {
    async fn list_customers(&self, spec: &QuerySpec) -> AppResult<(Vec<Customer>, i64)> {
        let schema = self.registry.schema("customers")?;

        let total: i64 = count_query(schema, spec)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to count customers", error))?;

        let rows = page_query(SELECT_CUSTOMERS, schema, spec)
            .build_query_as::<CustomerRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to list customers", error))?;

        let customers = rows
            .into_iter()
            .map(customer_from_row)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((customers, total))
    }

    async fn find_customer(&self, customer_id: i32) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "{SELECT_CUSTOMERS} WHERE customer_id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(&format!("failed to find customer '{customer_id}'"), error)
        })?;

        row.map(customer_from_row).transpose()
    }

    async fn customers_by_ids(&self, customer_ids: &[i32]) -> AppResult<Vec<Customer>> {
        if customer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "{SELECT_CUSTOMERS} WHERE customer_id = ANY($1) ORDER BY customer_id"
        ))
        .bind(customer_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to fetch customers by id", error))?;

        rows.into_iter().map(customer_from_row).collect()
    }

    async fn insert_customer(&self, customer: &Customer) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (company_name, contact_name, city, country, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING customer_id, company_name, contact_name, city, country, phone
            "#,
        )
        .bind(customer.company_name())
        .bind(customer.contact_name())
        .bind(customer.city())
        .bind(customer.country())
        .bind(customer.phone())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to insert customer", error))?;

        customer_from_row(row)
    }

    async fn update_customer(&self, customer: &Customer) -> AppResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            UPDATE customers
            SET company_name = $2,
                contact_name = $3,
                city = $4,
                country = $5,
                phone = $6
            WHERE customer_id = $1
            RETURNING customer_id, company_name, contact_name, city, country, phone
            "#,
        )
        .bind(customer.customer_id())
        .bind(customer.company_name())
        .bind(customer.contact_name())
        .bind(customer.city())
        .bind(customer.country())
        .bind(customer.phone())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(
                &format!("failed to update customer '{}'", customer.customer_id()),
                error,
            )
        })?;

        row.map(customer_from_row).transpose()
    }

    async fn order_counts(&self, customer_ids: &[i32]) -> AppResult<Vec<(i32, i64)>> {
        if customer_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT customer_id, COUNT(*)
            FROM orders
            WHERE customer_id = ANY($1)
            GROUP BY customer_id
            ORDER BY customer_id
            "#,
        )
        .bind(customer_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to count orders per customer", error))
    }

    async fn delete_customer(&self, customer_id: i32, detach_orders: bool) -> AppResult<bool> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            map_store_error(
                &format!("failed to start delete transaction for customer '{customer_id}'"),
                error,
            )
        })?;

        if detach_orders {
            sqlx::query("UPDATE orders SET customer_id = NULL WHERE customer_id = $1")
                .bind(customer_id)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    map_store_error(
                        &format!("failed to detach orders from customer '{customer_id}'"),
                        error,
                    )
                })?;
        }

        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                map_store_error(&format!("failed to delete customer '{customer_id}'"), error)
            })?;

        transaction.commit().await.map_err(|error| {
            map_store_error(
                &format!("failed to commit delete transaction for customer '{customer_id}'"),
                error,
            )
        })?;

        Ok(result.rows_affected() > 0)
    }
}
