//! Repository port and write inputs for the employee directory.

use async_trait::async_trait;
use chrono::NaiveDate;
use northwind_core::AppResult;
use northwind_domain::Employee;

use crate::QuerySpec;

/// Field values for a new employee.
#[derive(Debug, Clone)]
pub struct CreateEmployee {
    /// First name, required.
    pub first_name: String,
    /// Last name, required.
    pub last_name: String,
    /// Job title.
    pub title: Option<String>,
    /// Birth date.
    pub birth_date: Option<NaiveDate>,
    /// Hire date.
    pub hire_date: Option<NaiveDate>,
    /// City.
    pub city: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Manager reference.
    pub reports_to: Option<i32>,
}

/// Partial employee update.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployee {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New job title.
    pub title: Option<Option<String>>,
    /// New birth date.
    pub birth_date: Option<Option<NaiveDate>>,
    /// New hire date.
    pub hire_date: Option<Option<NaiveDate>>,
    /// New city.
    pub city: Option<Option<String>>,
    /// New country.
    pub country: Option<Option<String>>,
    /// New manager reference.
    pub reports_to: Option<Option<i32>>,
}

/// Employee persistence port.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Fetches one page of employees plus the total count.
    async fn list_employees(&self, spec: &QuerySpec) -> AppResult<(Vec<Employee>, i64)>;

    /// Finds an employee by identifier.
    async fn find_employee(&self, employee_id: i32) -> AppResult<Option<Employee>>;

    /// Fetches employees by identifier set.
    async fn employees_by_ids(&self, employee_ids: &[i32]) -> AppResult<Vec<Employee>>;

    /// Fetches the whole directory for hierarchy construction.
    async fn all_employees(&self) -> AppResult<Vec<Employee>>;

    /// Inserts a validated employee.
    async fn insert_employee(&self, employee: &Employee) -> AppResult<Employee>;

    /// Overwrites an employee row from a validated entity.
    async fn update_employee(&self, employee: &Employee) -> AppResult<Option<Employee>>;

    /// Counts orders taken by an employee.
    async fn count_orders_taken(&self, employee_id: i32) -> AppResult<i64>;

    /// Counts direct reports of an employee.
    async fn count_direct_reports(&self, employee_id: i32) -> AppResult<i64>;

    /// Deletes an employee, optionally detaching their orders and direct
    /// reports first. Returns whether a row was deleted.
    async fn delete_employee(&self, employee_id: i32, detach: bool) -> AppResult<bool>;
}
