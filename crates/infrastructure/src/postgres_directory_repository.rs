use async_trait::async_trait;
use chrono::NaiveDate;
use northwind_application::{EmployeeRepository, QuerySpec};
use northwind_core::AppResult;
use northwind_domain::{Employee, SchemaRegistry};
use sqlx::PgPool;
use std::sync::Arc;

use crate::query::{count_query, page_query};
use crate::store_error::map_store_error;

const SELECT_EMPLOYEES: &str = "SELECT employee_id, first_name, last_name, title, birth_date, \
     hire_date, city, country, reports_to FROM employees";

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    employee_id: i32,
    first_name: String,
    last_name: String,
    title: Option<String>,
    birth_date: Option<NaiveDate>,
    hire_date: Option<NaiveDate>,
    city: Option<String>,
    country: Option<String>,
    reports_to: Option<i32>,
}

fn employee_from_row(row: EmployeeRow) -> AppResult<Employee> {
    Employee::new(
        row.employee_id,
        row.first_name,
        row.last_name,
        row.title,
        row.birth_date,
        row.hire_date,
        row.city,
        row.country,
        row.reports_to,
    )
}

/// Postgres adapter for the employee directory port.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
    registry: Arc<SchemaRegistry>,
}

impl PostgresDirectoryRepository {
    /// Creates the adapter over a pooled connection set and the schema
    /// registry.
    pub fn new(pool: PgPool, registry: Arc<SchemaRegistry>) -> Self {
        Self { pool, registry }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresDirectoryRepository {
    async fn list_employees(&self, spec: &QuerySpec) -> AppResult<(Vec<Employee>, i64)> {
        let schema = self.registry.schema("employees")?;

        let total: i64 = count_query(schema, spec)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to count employees", error))?;

        let rows = page_query(SELECT_EMPLOYEES, schema, spec)
            .build_query_as::<EmployeeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| map_store_error("failed to list employees", error))?;

        let employees = rows
            .into_iter()
            .map(employee_from_row)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((employees, total))
    }

    async fn find_employee(&self, employee_id: i32) -> AppResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "{SELECT_EMPLOYEES} WHERE employee_id = $1"
        ))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(&format!("failed to find employee '{employee_id}'"), error)
        })?;

        row.map(employee_from_row).transpose()
    }

    async fn employees_by_ids(&self, employee_ids: &[i32]) -> AppResult<Vec<Employee>> {
        if employee_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "{SELECT_EMPLOYEES} WHERE employee_id = ANY($1) ORDER BY employee_id"
        ))
        .bind(employee_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to fetch employees by id", error))?;

        rows.into_iter().map(employee_from_row).collect()
    }

    async fn all_employees(&self) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "{SELECT_EMPLOYEES} ORDER BY employee_id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to fetch the employee directory", error))?;

        rows.into_iter().map(employee_from_row).collect()
    }

    async fn insert_employee(&self, employee: &Employee) -> AppResult<Employee> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            INSERT INTO employees (first_name, last_name, title, birth_date, hire_date,
                                   city, country, reports_to)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING employee_id, first_name, last_name, title, birth_date, hire_date,
                      city, country, reports_to
            "#,
        )
        .bind(employee.first_name())
        .bind(employee.last_name())
        .bind(employee.title())
        .bind(employee.birth_date())
        .bind(employee.hire_date())
        .bind(employee.city())
        .bind(employee.country())
        .bind(employee.reports_to())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_store_error("failed to insert employee", error))?;

        employee_from_row(row)
    }

    async fn update_employee(&self, employee: &Employee) -> AppResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            UPDATE employees
            SET first_name = $2,
                last_name = $3,
                title = $4,
                birth_date = $5,
                hire_date = $6,
                city = $7,
                country = $8,
                reports_to = $9
            WHERE employee_id = $1
            RETURNING employee_id, first_name, last_name, title, birth_date, hire_date,
                      city, country, reports_to
            "#,
        )
        .bind(employee.employee_id())
        .bind(employee.first_name())
        .bind(employee.last_name())
        .bind(employee.title())
        .bind(employee.birth_date())
        .bind(employee.hire_date())
        .bind(employee.city())
        .bind(employee.country())
        .bind(employee.reports_to())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            map_store_error(
                &format!("failed to update employee '{}'", employee.employee_id()),
                error,
            )
        })?;

        row.map(employee_from_row).transpose()
    }

    async fn count_orders_taken(&self, employee_id: i32) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE employee_id = $1")
            .bind(employee_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                map_store_error(
                    &format!("failed to count orders for employee '{employee_id}'"),
                    error,
                )
            })
    }

    async fn count_direct_reports(&self, employee_id: i32) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE reports_to = $1")
            .bind(employee_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                map_store_error(
                    &format!("failed to count direct reports for employee '{employee_id}'"),
                    error,
                )
            })
    }

    async fn delete_employee(&self, employee_id: i32, detach: bool) -> AppResult<bool> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            map_store_error(
                &format!("failed to start delete transaction for employee '{employee_id}'"),
                error,
            )
        })?;

        if detach {
            sqlx::query("UPDATE orders SET employee_id = NULL WHERE employee_id = $1")
                .bind(employee_id)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    map_store_error(
                        &format!("failed to detach orders from employee '{employee_id}'"),
                        error,
                    )
                })?;

            sqlx::query("UPDATE employees SET reports_to = NULL WHERE reports_to = $1")
                .bind(employee_id)
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    map_store_error(
                        &format!("failed to detach reports from employee '{employee_id}'"),
                        error,
                    )
                })?;
        }

        let result = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
            .bind(employee_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                map_store_error(&format!("failed to delete employee '{employee_id}'"), error)
            })?;

        transaction.commit().await.map_err(|error| {
            map_store_error(
                &format!("failed to commit delete transaction for employee '{employee_id}'"),
                error,
            )
        })?;

        Ok(result.rows_affected() > 0)
    }
}
