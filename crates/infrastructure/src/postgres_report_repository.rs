use async_trait::async_trait;
use northwind_application::{
    CategorySalesRow, ReportRepository, SupplierStatsRow, TopCustomerRow, YearlySalesRow,
};
use northwind_core::AppResult;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::store_error::map_store_error;

/// Postgres adapter for the aggregate reporting port. Every aggregation
/// is computed by the store with a deterministic ascending-id tie-break.
#[derive(Clone)]
pub struct PostgresReportRepository {
    pool: PgPool,
}

impl PostgresReportRepository {
    /// Creates the adapter over a pooled connection set.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TopCustomerDbRow {
    customer_id: i32,
    company_name: String,
    order_count: i64,
    total_spend: Decimal,
}

#[derive(sqlx::FromRow)]
struct CategorySalesDbRow {
    category_id: i32,
    category_name: String,
    units_sold: i64,
    revenue: Decimal,
}

#[derive(sqlx::FromRow)]
struct YearlySalesDbRow {
    year: i32,
    order_count: i64,
    revenue: Decimal,
}

#[derive(sqlx::FromRow)]
struct SupplierStatsDbRow {
    supplier_id: i32,
    company_name: String,
    product_count: i64,
    units_in_stock: i64,
    average_unit_price: Option<Decimal>,
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn top_customers(&self, limit: i64) -> AppResult<Vec<TopCustomerRow>> {
        let rows = sqlx::query_as::<_, TopCustomerDbRow>(
            r#"
            SELECT c.customer_id, c.company_name,
                   COUNT(DISTINCT o.order_id) AS order_count,
                   COALESCE(SUM(d.unit_price * d.quantity * (1 - d.discount)), 0) AS total_spend
            FROM customers c
            JOIN orders o ON o.customer_id = c.customer_id
            LEFT JOIN order_details d ON d.order_id = o.order_id
            GROUP BY c.customer_id, c.company_name
            ORDER BY total_spend DESC, c.customer_id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to rank customers by spend", error))?;

        Ok(rows
            .into_iter()
            .map(|row| TopCustomerRow {
                customer_id: row.customer_id,
                company_name: row.company_name,
                order_count: row.order_count,
                total_spend: row.total_spend,
            })
            .collect())
    }

    async fn sales_by_category(&self, year: Option<i32>) -> AppResult<Vec<CategorySalesRow>> {
        let rows = sqlx::query_as::<_, CategorySalesDbRow>(
            r#"
            SELECT cat.category_id, cat.category_name,
                   COALESCE(SUM(d.quantity), 0) AS units_sold,
                   COALESCE(SUM(d.unit_price * d.quantity * (1 - d.discount)), 0) AS revenue
            FROM categories cat
            JOIN products p ON p.category_id = cat.category_id
            JOIN order_details d ON d.product_id = p.product_id
            JOIN orders o ON o.order_id = d.order_id
            WHERE $1::INT IS NULL OR EXTRACT(YEAR FROM o.order_date) = $1
            GROUP BY cat.category_id, cat.category_name
            ORDER BY revenue DESC, cat.category_id ASC
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to sum sales by category", error))?;

        Ok(rows
            .into_iter()
            .map(|row| CategorySalesRow {
                category_id: row.category_id,
                category_name: row.category_name,
                units_sold: row.units_sold,
                revenue: row.revenue,
            })
            .collect())
    }

    async fn sales_by_year(&self) -> AppResult<Vec<YearlySalesRow>> {
        let rows = sqlx::query_as::<_, YearlySalesDbRow>(
            r#"
            SELECT EXTRACT(YEAR FROM o.order_date)::INT AS year,
                   COUNT(DISTINCT o.order_id) AS order_count,
                   COALESCE(SUM(d.unit_price * d.quantity * (1 - d.discount)), 0) AS revenue
            FROM orders o
            LEFT JOIN order_details d ON d.order_id = o.order_id
            WHERE o.order_date IS NOT NULL
            GROUP BY EXTRACT(YEAR FROM o.order_date)
            ORDER BY year ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to sum sales by year", error))?;

        Ok(rows
            .into_iter()
            .map(|row| YearlySalesRow {
                year: row.year,
                order_count: row.order_count,
                revenue: row.revenue,
            })
            .collect())
    }

    async fn supplier_stats(&self) -> AppResult<Vec<SupplierStatsRow>> {
        let rows = sqlx::query_as::<_, SupplierStatsDbRow>(
            r#"
            SELECT s.supplier_id, s.company_name,
                   COUNT(p.product_id) AS product_count,
                   COALESCE(SUM(p.units_in_stock), 0) AS units_in_stock,
                   AVG(p.unit_price) AS average_unit_price
            FROM suppliers s
            LEFT JOIN products p ON p.supplier_id = s.supplier_id
            GROUP BY s.supplier_id, s.company_name
            ORDER BY s.company_name ASC, s.supplier_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to compute supplier statistics", error))?;

        Ok(rows
            .into_iter()
            .map(|row| SupplierStatsRow {
                supplier_id: row.supplier_id,
                company_name: row.company_name,
                product_count: row.product_count,
                units_in_stock: row.units_in_stock,
                average_unit_price: row.average_unit_price,
            })
            .collect())
    }
}
