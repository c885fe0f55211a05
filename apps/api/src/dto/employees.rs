use chrono::NaiveDate;
use northwind_application::{CreateEmployee, EmployeeNode, EmployeeView, UpdateEmployee};
use northwind_domain::Employee;
use serde::{Deserialize, Serialize};

use super::common::double_option;

/// Bare employee record, used when attached as the manager relation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
}

impl From<Employee> for EmployeeRecord {
    fn from(employee: Employee) -> Self {
        Self {
            employee_id: employee.employee_id(),
            first_name: employee.first_name().to_owned(),
            last_name: employee.last_name().to_owned(),
            title: employee.title().map(str::to_owned),
        }
    }
}

/// Employee payload with derived age and tenure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub employee_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub reports_to: Option<i32>,
    pub age: Option<i32>,
    pub years_of_service: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<EmployeeRecord>,
}

impl From<EmployeeView> for EmployeeResponse {
    fn from(view: EmployeeView) -> Self {
        Self {
            employee_id: view.employee.employee_id(),
            first_name: view.employee.first_name().to_owned(),
            last_name: view.employee.last_name().to_owned(),
            title: view.employee.title().map(str::to_owned),
            birth_date: view.employee.birth_date(),
            hire_date: view.employee.hire_date(),
            city: view.employee.city().map(str::to_owned),
            country: view.employee.country().map(str::to_owned),
            reports_to: view.employee.reports_to(),
            age: view.age,
            years_of_service: view.years_of_service,
            manager: view.manager.map(EmployeeRecord::from),
        }
    }
}

/// One node of the manager tree.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNodeResponse {
    pub employee_id: i32,
    pub name: String,
    pub title: Option<String>,
    pub reports: Vec<HierarchyNodeResponse>,
}

impl From<EmployeeNode> for HierarchyNodeResponse {
    fn from(node: EmployeeNode) -> Self {
        Self {
            employee_id: node.employee_id,
            name: node.name,
            title: node.title,
            reports: node
                .reports
                .into_iter()
                .map(HierarchyNodeResponse::from)
                .collect(),
        }
    }
}

/// Create-employee request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub reports_to: Option<i32>,
}

impl From<CreateEmployeeRequest> for CreateEmployee {
    fn from(request: CreateEmployeeRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            title: request.title,
            birth_date: request.birth_date,
            hire_date: request.hire_date,
            city: request.city,
            country: request.country,
            reports_to: request.reports_to,
        }
    }
}

/// Partial update request body for an employee.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub hire_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub reports_to: Option<Option<i32>>,
}

impl From<UpdateEmployeeRequest> for UpdateEmployee {
    fn from(request: UpdateEmployeeRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            title: request.title,
            birth_date: request.birth_date,
            hire_date: request.hire_date,
            city: request.city,
            country: request.country,
            reports_to: request.reports_to,
        }
    }
}
