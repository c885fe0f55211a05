//! Employee directory service, including the manager hierarchy.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use northwind_core::{AppError, AppResult};
use northwind_domain::{Employee, SchemaRegistry};

use crate::directory_ports::{CreateEmployee, EmployeeRepository, UpdateEmployee};
use crate::list_query::{Page, build_include_set, build_query_spec};

mod hierarchy;

#[cfg(test)]
mod tests;

pub(crate) use hierarchy::build_hierarchy;

/// An employee with derived fields and the optional manager relation.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeView {
    /// The fetched row.
    pub employee: Employee,
    /// Derived age in whole years, when a birth date is recorded.
    pub age: Option<i32>,
    /// Derived tenure in average-length years, when a hire date is
    /// recorded.
    pub years_of_service: Option<i32>,
    /// Manager, when the request asked for it.
    pub manager: Option<Employee>,
}

/// One node of the manager tree.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeNode {
    /// Employee identifier.
    pub employee_id: i32,
    /// Display name.
    pub name: String,
    /// Job title.
    pub title: Option<String>,
    /// Direct reports, ordered by identifier.
    pub reports: Vec<EmployeeNode>,
}

/// Orchestrates directory reads and writes over the repository port.
#[derive(Clone)]
pub struct DirectoryService {
    registry: Arc<SchemaRegistry>,
    employees: Arc<dyn EmployeeRepository>,
}

impl DirectoryService {
    /// Creates the service over its port.
    pub fn new(registry: Arc<SchemaRegistry>, employees: Arc<dyn EmployeeRepository>) -> Self {
        Self {
            registry,
            employees,
        }
    }

    /// Lists employees with derived age and tenure.
    pub async fn list_employees(
        &self,
        params: &BTreeMap<String, String>,
    ) -> AppResult<Page<EmployeeView>> {
        let schema = self.registry.schema("employees")?;
        let spec = build_query_spec(schema, params, today())?;
        let (employees, total) = self.employees.list_employees(&spec).await?;

        let managers = if spec.includes("manager") {
            let ids: Vec<i32> = {
                let mut ids: Vec<i32> =
                    employees.iter().filter_map(Employee::reports_to).collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            };
            self.employees
                .employees_by_ids(&ids)
                .await?
                .into_iter()
                .map(|manager| (manager.employee_id(), manager))
                .collect()
        } else {
            BTreeMap::new()
        };

        let as_of = spec.as_of();
        let items = employees
            .into_iter()
            .map(|employee| view_for(employee, &managers, as_of))
            .collect();

        Ok(Page::new(items, total, &spec))
    }

    /// Gets one employee with derived fields.
    pub async fn get_employee(
        &self,
        employee_id: i32,
        params: &BTreeMap<String, String>,
    ) -> AppResult<EmployeeView> {
        let schema = self.registry.schema("employees")?;
        let includes = build_include_set(schema, params)?;

        let employee = self
            .employees
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("employee '{employee_id}' does not exist"))
            })?;

        let mut managers = BTreeMap::new();
        if includes.contains("manager")
            && let Some(manager_id) = employee.reports_to()
            && let Some(manager) = self.employees.find_employee(manager_id).await?
        {
            managers.insert(manager_id, manager);
        }

        Ok(view_for(employee, &managers, today()))
    }

    /// Creates an employee; the named manager must exist.
    pub async fn create_employee(&self, input: CreateEmployee) -> AppResult<EmployeeView> {
        if let Some(manager_id) = input.reports_to
            && self.employees.find_employee(manager_id).await?.is_none()
        {
            return Err(AppError::invalid_field(
                "reportsTo",
                format!("employee '{manager_id}' does not exist"),
            ));
        }

        let draft = Employee::new(
            0,
            input.first_name,
            input.last_name,
            input.title,
            input.birth_date,
            input.hire_date,
            input.city,
            input.country,
            input.reports_to,
        )?;

        let created = self.employees.insert_employee(&draft).await?;
        Ok(view_for(created, &BTreeMap::new(), today()))
    }

    /// Applies a partial update; manager changes are checked against the
    /// existing chain so no reporting cycle can be written.
    pub async fn update_employee(
        &self,
        employee_id: i32,
        patch: UpdateEmployee,
    ) -> AppResult<EmployeeView> {
        let existing = self
            .employees
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("employee '{employee_id}' does not exist"))
            })?;

        let reports_to = patch.reports_to.unwrap_or_else(|| existing.reports_to());
        if let Some(manager_id) = reports_to
            && reports_to != existing.reports_to()
        {
            if self.employees.find_employee(manager_id).await?.is_none() {
                return Err(AppError::invalid_field(
                    "reportsTo",
                    format!("employee '{manager_id}' does not exist"),
                ));
            }

            self.ensure_no_reporting_cycle(employee_id, manager_id)
                .await?;
        }

        let merged = Employee::new(
            employee_id,
            patch
                .first_name
                .unwrap_or_else(|| existing.first_name().to_owned()),
            patch
                .last_name
                .unwrap_or_else(|| existing.last_name().to_owned()),
            patch.title.unwrap_or_else(|| existing.title().map(str::to_owned)),
            patch.birth_date.unwrap_or_else(|| existing.birth_date()),
            patch.hire_date.unwrap_or_else(|| existing.hire_date()),
            patch.city.unwrap_or_else(|| existing.city().map(str::to_owned)),
            patch
                .country
                .unwrap_or_else(|| existing.country().map(str::to_owned)),
            reports_to,
        )?;

        let updated = self
            .employees
            .update_employee(&merged)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("employee '{employee_id}' does not exist"))
            })?;

        Ok(view_for(updated, &BTreeMap::new(), today()))
    }

    /// Deletes an employee; taken orders and direct reports block the
    /// delete unless `force` detaches both.
    pub async fn delete_employee(&self, employee_id: i32, force: bool) -> AppResult<()> {
        let employee = self
            .employees
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("employee '{employee_id}' does not exist"))
            })?;

        let orders = self.employees.count_orders_taken(employee_id).await?;
        let reports = self.employees.count_direct_reports(employee_id).await?;
        let dependents = orders + reports;
        if dependents > 0 && !force {
            return Err(AppError::DependencyConflict {
                message: format!(
                    "employee '{} {}' still has orders or direct reports",
                    employee.first_name(),
                    employee.last_name()
                ),
                dependents,
            });
        }

        let deleted = self.employees.delete_employee(employee_id, force).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "employee '{employee_id}' does not exist"
            )));
        }

        Ok(())
    }

    /// Builds the manager tree for the whole directory. A malformed
    /// `reports_to` chain is a structural error, never an endless walk.
    pub async fn hierarchy(&self) -> AppResult<Vec<EmployeeNode>> {
        let employees = self.employees.all_employees().await?;
        build_hierarchy(&employees)
    }

    /// Walks up from the proposed manager; reaching the employee again
    /// means the update would close a cycle.
    async fn ensure_no_reporting_cycle(
        &self,
        employee_id: i32,
        manager_id: i32,
    ) -> AppResult<()> {
        let mut seen = BTreeSet::new();
        let mut current = Some(manager_id);

        while let Some(id) = current {
            if id == employee_id {
                return Err(AppError::invalid_field(
                    "reportsTo",
                    "would create a reporting cycle",
                ));
            }

            if !seen.insert(id) {
                break;
            }

            current = self
                .employees
                .find_employee(id)
                .await?
                .and_then(|manager| manager.reports_to());
        }

        Ok(())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn view_for(
    employee: Employee,
    managers: &BTreeMap<i32, Employee>,
    as_of: NaiveDate,
) -> EmployeeView {
    EmployeeView {
        age: employee.age_on(as_of),
        years_of_service: employee.years_of_service_on(as_of),
        manager: employee
            .reports_to()
            .and_then(|id| managers.get(&id).cloned()),
        employee,
    }
}
