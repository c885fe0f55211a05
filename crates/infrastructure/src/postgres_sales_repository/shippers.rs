use super::*;

const SELECT_SHIPPERS: &str = "SELECT shipper_id, company_name, phone FROM shippers";

#[derive(sqlx::FromRow)]
struct ShipperRow {
    shipper_id: i32,
    company_name: String,
    phone: Option<String>,
}

fn shipper_from_row(row: ShipperRow) -> AppResult<Shipper> {
    Shipper::new(row.shipper_id, row.company_name, row.phone)
}

#[async_trait]
impl ShipperRepository for PostgresSalesRepository {
    async fn list_shippers(&self, spec: &QuerySpec) -> AppResult<(Vec<Shipper>, i64)> {
        let schema = self.registry.schema("shippers")?;

        let total: i64 = count_query(schema, spec)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to count shippers", error))?;

        let rows = page_query(SELECT_SHIPPERS, schema, spec)
            .build_query_as::<ShipperRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to list shippers", error))?;

        let shippers = rows
            .into_iter()
            .map(shipper_from_row)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((shippers, total))
    }

    async fn find_shipper(&self, shipper_id: i32) -> AppResult<Option<Shipper>> {
        let row = sqlx::query_as::<_, ShipperRow>(&format!(
            "{SELECT_SHIPPERS} WHERE shipper_id = $1"
        ))
        .bind(shipper_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(&format!("failed to find shipper '{shipper_id}'"), error)
        })?;

        row.map(shipper_from_row).transpose()
    }

    async fn shippers_by_ids(&self, shipper_ids: &[i32]) -> AppResult<Vec<Shipper>> {
        if shipper_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ShipperRow>(&format!(
            "{SELECT_SHIPPERS} WHERE shipper_id = ANY($1) ORDER BY shipper_id"
        ))
        .bind(shipper_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to fetch shippers by id", error))?;

        rows.into_iter().map(shipper_from_row).collect()
    }

    async fn insert_shipper(&self, shipper: &Shipper) -> AppResult<Shipper> {
        let row = sqlx::query_as::<_, ShipperRow>(
            r#"
            INSERT INTO shippers (company_name, phone)
            VALUES ($1, $2)
            RETURNING shipper_id, company_name, phone
            "#,
        )
        .bind(shipper.company_name())
        .bind(shipper.phone())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to insert shipper", error))?;

        shipper_from_row(row)
    }

    async fn update_shipper(&self, shipper: &Shipper) -> AppResult<Option<Shipper>> {
        let row = sqlx::query_as::<_, ShipperRow>(
            r#"
            UPDATE shippers
            SET company_name = $2,
                phone = $3
            WHERE shipper_id = $1
            RETURNING shipper_id, company_name, phone
            "#,
        )
        .bind(shipper.shipper_id())
        .bind(shipper.company_name())
        .bind(shipper.phone())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(
                &format!("failed to update shipper '{}'", shipper.shipper_id()),
                error,
            )
        })?;

        row.map(shipper_from_row).transpose()
    }

    async fn order_counts(&self, shipper_ids: &[i32]) -> AppResult<Vec<(i32, i64)>> {
        if shipper_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT ship_via, COUNT(*)
            FROM orders
            WHERE ship_via = ANY($1)
            GROUP BY ship_via
            ORDER BY ship_via
            "#,
        )
        .bind(shipper_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to count orders per shipper", error))
    }

    async fn delete_shipper(&self, shipper_id: i32, detach_orders: bool) -> AppResult<bool> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            map_store_error(
                &format!("failed to start delete transaction for shipper '{shipper_id}'"),
                error,
            )
        })?;

        if detach_orders {
            sqlx::query("UPDATE orders SET ship_via = NULL WHERE ship_via = $1")
                .bind(shipper_id)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    map_store_error(
                        &format!("failed to detach orders from shipper '{shipper_id}'"),
                        error,
                    )
                })?;
        }

        let result = sqlx::query("DELETE FROM shippers WHERE shipper_id = $1")
            .bind(shipper_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                map_store_error(&format!("failed to delete shipper '{shipper_id}'"), error)
            })?;

        transaction.commit().await.map_err(|error| {
            map_store_error(
                &format!("failed to commit delete transaction for shipper '{shipper_id}'"),
                error,
            )
        })?;

        Ok(result.rows_affected() > 0)
    }
}
