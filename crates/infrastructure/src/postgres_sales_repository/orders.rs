use super::*;

const SELECT_ORDERS: &str = "SELECT order_id, customer_id, employee_id, order_date, \
     required_date, shipped_date, ship_via, freight FROM orders";

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: i32,
    customer_id: Option<i32>,
    employee_id: Option<i32>,
    order_date: Option<NaiveDate>,
    required_date: Option<NaiveDate>,
    shipped_date: Option<NaiveDate>,
    ship_via: Option<i32>,
    freight: Decimal,
}

#[derive(sqlx::FromRow)]
struct DetailRow {
    order_id: i32,
    product_id: i32,
    unit_price: Decimal,
    quantity: i16,
    discount: Decimal,
    product_name: String,
}

fn order_from_row(row: OrderRow) -> AppResult<Order> {
    Order::new(
        row.order_id,
        row.customer_id,
        row.employee_id,
        row.order_date,
        row.required_date,
        row.shipped_date,
        row.ship_via,
        row.freight,
    )
}

fn detail_line_from_row(row: DetailRow) -> AppResult<DetailLine> {
    Ok(DetailLine {
        detail: OrderDetail::new(
            row.order_id,
            row.product_id,
            row.unit_price,
            row.quantity,
            row.discount,
        )?,
        product_name: row.product_name,
    })
}

/// Inserts the requested lines for an order, capturing a missing unit
/// price from the product row inside the same transaction.
async fn insert_detail_lines(
    transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: i32,
    details: &[NewOrderDetail],
) -> AppResult<Vec<OrderDetail>> {
    let mut inserted = Vec::with_capacity(details.len());

    for line in details {
        let current_price: Option<Option<Decimal>> =
            sqlx::query_scalar("SELECT unit_price FROM products WHERE product_id = $1")
                .bind(line.product_id)
                .fetch_optional(&mut **transaction)
                .await
                .map_err(|error| {
                    map_store_error(
                        &format!("failed to resolve price for product '{}'", line.product_id),
                        error,
                    )
                })?;

        let Some(current_price) = current_price else {
            // Propagating the error drops the transaction and rolls back
            // every line written so far.
            return Err(AppError::invalid_field(
                "details",
                format!("product '{}' does not exist", line.product_id),
            ));
        };

        let unit_price = line
            .unit_price
            .or(current_price)
            .unwrap_or(Decimal::ZERO);

        sqlx::query(
            r#"
            INSERT INTO order_details (order_id, product_id, unit_price, quantity, discount)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order_id)
        .bind(line.product_id)
        .bind(unit_price)
        .bind(line.quantity)
        .bind(line.discount)
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            map_store_error(
                &format!("failed to insert order line for order '{order_id}'"),
                error,
            )
        })?;

        inserted.push(OrderDetail::new(
            order_id,
            line.product_id,
            unit_price,
            line.quantity,
            line.discount,
        )?);
    }

    Ok(inserted)
}

#[async_trait]
impl OrderRepository for PostgresSalesRepository {
    async fn list_orders(&self, spec: &QuerySpec) -> AppResult<(Vec<Order>, i64)> {
        let schema = self.registry.schema("orders")?;

        let total: i64 = count_query(schema, spec)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to count orders", error))?;

        let rows = page_query(SELECT_ORDERS, schema, spec)
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to list orders", error))?;

        let orders = rows
            .into_iter()
            .map(order_from_row)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((orders, total))
    }

    async fn find_order(&self, order_id: i32) -> AppResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDERS} WHERE order_id = $1"))
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                map_store_error(&format!("failed to find order '{order_id}'"), error)
            })?;

        row.map(order_from_row).transpose()
    }

    async fn create_order(
        &self,
        order: &Order,
        details: &[NewOrderDetail],
    ) -> AppResult<(Order, Vec<OrderDetail>)> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            map_store_error("failed to start order create transaction", error)
        })?;

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (customer_id, employee_id, order_date, required_date,
                                shipped_date, ship_via, freight)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING order_id, customer_id, employee_id, order_date, required_date,
                      shipped_date, ship_via, freight
            "#,
        )
        .bind(order.customer_id())
        .bind(order.employee_id())
        .bind(order.order_date())
        .bind(order.required_date())
        .bind(order.shipped_date())
        .bind(order.ship_via())
        .bind(order.freight())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| map_store_error("failed to insert order", error))?;

        let created = order_from_row(row)?;
        let lines = insert_detail_lines(&mut transaction, created.order_id(), details).await?;

        transaction.commit().await.map_err(|error| {
            map_store_error("failed to commit order create transaction", error)
        })?;

        Ok((created, lines))
    }

    async fn update_order(
        &self,
        order: &Order,
        details: Option<&[NewOrderDetail]>,
    ) -> AppResult<Option<(Order, Vec<OrderDetail>)>> {
        let order_id = order.order_id();
        let mut transaction = self.pool.begin().await.map_err(|error| {
            map_store_error(
                &format!("failed to start update transaction for order '{order_id}'"),
                error,
            )
        })?;

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            UPDATE orders
            SET customer_id = $2,
                employee_id = $3,
                order_date = $4,
                required_date = $5,
                shipped_date = $6,
                ship_via = $7,
                freight = $8
            WHERE order_id = $1
            RETURNING order_id, customer_id, employee_id, order_date, required_date,
                      shipped_date, ship_via, freight
            "#,
        )
        .bind(order_id)
        .bind(order.customer_id())
        .bind(order.employee_id())
        .bind(order.order_date())
        .bind(order.required_date())
        .bind(order.shipped_date())
        .bind(order.ship_via())
        .bind(order.freight())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            map_store_error(&format!("failed to update order '{order_id}'"), error)
        })?;

        let Some(row) = row else {
            return Ok(None);
        };
        let updated = order_from_row(row)?;

        let lines = match details {
            Some(replacement) => {
                sqlx::query("DELETE FROM order_details WHERE order_id = $1")
                    .bind(order_id)
                    .execute(&mut *transaction)
                    .await
                    .map_err(|error| {
                        map_store_error(
                            &format!("failed to clear order lines for order '{order_id}'"),
                            error,
                        )
                    })?;

                insert_detail_lines(&mut transaction, order_id, replacement).await?
            }
            None => {
                let rows = sqlx::query_as::<_, (i32, i32, Decimal, i16, Decimal)>(
                    r#"
                    SELECT order_id, product_id, unit_price, quantity, discount
                    FROM order_details
                    WHERE order_id = $1
                    ORDER BY product_id
                    "#,
                )
                .bind(order_id)
                .fetch_all(&mut *transaction)
                .await
                .map_err(|error| {
                    map_store_error(
                        &format!("failed to fetch order lines for order '{order_id}'"),
                        error,
                    )
                })?;

                rows.into_iter()
                    .map(|(order_id, product_id, unit_price, quantity, discount)| {
                        OrderDetail::new(order_id, product_id, unit_price, quantity, discount)
                    })
                    .collect::<AppResult<Vec<_>>>()?
            }
        };

        transaction.commit().await.map_err(|error| {
            map_store_error(
                &format!("failed to commit update transaction for order '{order_id}'"),
                error,
            )
        })?;

        Ok(Some((updated, lines)))
    }

    async fn delete_order(&self, order_id: i32) -> AppResult<bool> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            map_store_error(
                &format!("failed to start delete transaction for order '{order_id}'"),
                error,
            )
        })?;

        sqlx::query("DELETE FROM order_details WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                map_store_error(
                    &format!("failed to delete order lines for order '{order_id}'"),
                    error,
                )
            })?;

        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                map_store_error(&format!("failed to delete order '{order_id}'"), error)
            })?;

        transaction.commit().await.map_err(|error| {
            map_store_error(
                &format!("failed to commit delete transaction for order '{order_id}'"),
                error,
            )
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn details_for_orders(&self, order_ids: &[i32]) -> AppResult<Vec<DetailLine>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, DetailRow>(
            r#"
            SELECT d.order_id, d.product_id, d.unit_price, d.quantity, d.discount,
                   p.product_name
            FROM order_details d
            JOIN products p ON p.product_id = d.product_id
            WHERE d.order_id = ANY($1)
            ORDER BY d.order_id, d.product_id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to fetch order lines", error))?;

        rows.into_iter().map(detail_line_from_row).collect()
    }

    async fn subtotals(&self, order_ids: &[i32]) -> AppResult<Vec<(i32, Decimal)>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        // The discounted sum is pushed to the store; pulling rows back to
        // add them up in memory would not survive real order volumes.
        sqlx::query_as::<_, (i32, Decimal)>(
            r#"
            SELECT order_id, SUM(unit_price * quantity * (1 - discount))
            FROM order_details
            WHERE order_id = ANY($1)
            GROUP BY order_id
            ORDER BY order_id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to sum order subtotals", error))
    }
}
