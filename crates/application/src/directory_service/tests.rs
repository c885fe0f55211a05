use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use northwind_core::{AppError, AppResult};
use northwind_domain::{Employee, SchemaRegistry, age_in_years};
use tokio::sync::Mutex;

use crate::directory_ports::{CreateEmployee, EmployeeRepository, UpdateEmployee};
use crate::list_query::QuerySpec;

use super::{DirectoryService, build_hierarchy};

fn employee(employee_id: i32, name: &str, reports_to: Option<i32>) -> Employee {
    Employee::new(
        employee_id,
        name,
        "Fuller",
        Some("Sales Representative".to_owned()),
        NaiveDate::from_ymd_opt(1963, 7, 2),
        NaiveDate::from_ymd_opt(1992, 4, 1),
        Some("London".to_owned()),
        Some("UK".to_owned()),
        reports_to,
    )
    .unwrap_or_else(|_| unreachable!())
}

#[derive(Default)]
struct FakeEmployeeRepository {
    employees: Mutex<Vec<Employee>>,
    order_counts: Mutex<BTreeMap<i32, i64>>,
}

#[async_trait]
impl EmployeeRepository for FakeEmployeeRepository {
    async fn list_employees(&self, _spec: &QuerySpec) -> AppResult<(Vec<Employee>, i64)> {
        let employees = self.employees.lock().await;
        Ok((employees.clone(), employees.len() as i64))
    }

    async fn find_employee(&self, employee_id: i32) -> AppResult<Option<Employee>> {
        let employees = self.employees.lock().await;
        Ok(employees
            .iter()
            .find(|employee| employee.employee_id() == employee_id)
            .cloned())
    }

    async fn employees_by_ids(&self, employee_ids: &[i32]) -> AppResult<Vec<Employee>> {
        let employees = self.employees.lock().await;
        Ok(employees
            .iter()
            .filter(|employee| employee_ids.contains(&employee.employee_id()))
            .cloned()
            .collect())
    }

    async fn all_employees(&self) -> AppResult<Vec<Employee>> {
        Ok(self.employees.lock().await.clone())
    }

    async fn insert_employee(&self, employee: &Employee) -> AppResult<Employee> {
        let mut employees = self.employees.lock().await;
        let next_id = employees
            .iter()
            .map(Employee::employee_id)
            .max()
            .unwrap_or(0)
            + 1;
        let stored = Employee::new(
            next_id,
            employee.first_name(),
            employee.last_name(),
            employee.title().map(str::to_owned),
            employee.birth_date(),
            employee.hire_date(),
            employee.city().map(str::to_owned),
            employee.country().map(str::to_owned),
            employee.reports_to(),
        )?;
        employees.push(stored.clone());
        Ok(stored)
    }

    async fn update_employee(&self, employee: &Employee) -> AppResult<Option<Employee>> {
        let mut employees = self.employees.lock().await;
        let Some(slot) = employees
            .iter_mut()
            .find(|stored| stored.employee_id() == employee.employee_id())
        else {
            return Ok(None);
        };
        *slot = employee.clone();
        Ok(Some(employee.clone()))
    }

    async fn count_orders_taken(&self, employee_id: i32) -> AppResult<i64> {
        Ok(self
            .order_counts
            .lock()
            .await
            .get(&employee_id)
            .copied()
            .unwrap_or(0))
    }

    async fn count_direct_reports(&self, employee_id: i32) -> AppResult<i64> {
        let employees = self.employees.lock().await;
        Ok(employees
            .iter()
            .filter(|employee| employee.reports_to() == Some(employee_id))
            .count() as i64)
    }

    async fn delete_employee(&self, employee_id: i32, _detach: bool) -> AppResult<bool> {
        let mut employees = self.employees.lock().await;
        let before = employees.len();
        employees.retain(|employee| employee.employee_id() != employee_id);
        Ok(employees.len() < before)
    }
}

async fn service_with(seed: Vec<Employee>) -> (DirectoryService, Arc<FakeEmployeeRepository>) {
    let repository = Arc::new(FakeEmployeeRepository::default());
    *repository.employees.lock().await = seed;
    let service = DirectoryService::new(
        Arc::new(SchemaRegistry::northwind()),
        repository.clone(),
    );
    (service, repository)
}

#[test]
fn hierarchy_nests_reports_under_their_manager() {
    let employees = vec![
        employee(2, "Andrew", None),
        employee(1, "Nancy", Some(2)),
        employee(3, "Janet", Some(2)),
        employee(4, "Margaret", Some(1)),
    ];

    let roots = build_hierarchy(&employees).unwrap_or_else(|_| unreachable!());
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].employee_id, 2);
    assert_eq!(roots[0].reports.len(), 2);
    assert_eq!(roots[0].reports[0].employee_id, 1);
    assert_eq!(roots[0].reports[0].reports[0].employee_id, 4);
    assert_eq!(roots[0].reports[1].employee_id, 3);
}

#[test]
fn hierarchy_reports_a_cycle_instead_of_looping() {
    let employees = vec![
        employee(1, "Nancy", Some(2)),
        employee(2, "Andrew", Some(1)),
        employee(3, "Janet", None),
    ];

    let result = build_hierarchy(&employees);
    match result {
        Err(AppError::Internal(message)) => assert!(message.contains("cycle")),
        _ => panic!("expected a structural error"),
    }
}

#[test]
fn hierarchy_rejects_a_dangling_manager_reference() {
    let employees = vec![employee(1, "Nancy", Some(99))];
    assert!(build_hierarchy(&employees).is_err());
}

#[tokio::test]
async fn list_employees_attaches_age_and_tenure() {
    let (service, _) = service_with(vec![employee(1, "Nancy", None)]).await;
    let page = service
        .list_employees(&BTreeMap::new())
        .await
        .unwrap_or_else(|_| unreachable!());

    let view = &page.items()[0];
    let today = chrono::Utc::now().date_naive();
    let birth = NaiveDate::from_ymd_opt(1963, 7, 2).unwrap_or_else(|| unreachable!());
    assert_eq!(view.age, Some(age_in_years(birth, today)));
    assert!(view.years_of_service.is_some());
}

#[tokio::test]
async fn create_employee_requires_an_existing_manager() {
    let (service, _) = service_with(Vec::new()).await;
    let result = service
        .create_employee(CreateEmployee {
            first_name: "Nancy".to_owned(),
            last_name: "Davolio".to_owned(),
            title: None,
            birth_date: None,
            hire_date: None,
            city: None,
            country: None,
            reports_to: Some(42),
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn update_employee_rejects_a_manager_change_that_closes_a_cycle() {
    let seed = vec![employee(1, "Andrew", None), employee(2, "Nancy", Some(1))];
    let (service, _) = service_with(seed).await;

    let result = service
        .update_employee(
            1,
            UpdateEmployee {
                reports_to: Some(Some(2)),
                ..UpdateEmployee::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn delete_employee_counts_orders_and_reports_as_dependents() {
    let seed = vec![employee(1, "Andrew", None), employee(2, "Nancy", Some(1))];
    let (service, repository) = service_with(seed).await;
    repository.order_counts.lock().await.insert(1, 4);

    let result = service.delete_employee(1, false).await;
    match result {
        Err(AppError::DependencyConflict { dependents, .. }) => assert_eq!(dependents, 5),
        _ => panic!("expected a dependency conflict"),
    }

    assert!(service.delete_employee(1, true).await.is_ok());
}
