use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use northwind_core::{AppError, AppResult};
use northwind_domain::{
    Customer, Employee, Order, OrderDetail, OrderStatus, SchemaRegistry, Shipper,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Mutex;

use crate::directory_ports::EmployeeRepository;
use crate::list_query::QuerySpec;
use crate::sales_ports::{
    CreateOrder, CustomerRepository, DetailLine, NewOrderDetail, OrderRepository,
    ShipperRepository, UpdateOrder,
};

use super::SalesService;

#[derive(Default)]
struct FakeCustomerRepository {
    customers: Mutex<Vec<Customer>>,
    order_counts: Mutex<BTreeMap<i32, i64>>,
}

#[async_trait]
impl CustomerRepository for FakeCustomerRepository {
    async fn list_customers(&self, _spec: &QuerySpec) -> AppResult<(Vec<Customer>, i64)> {
        let customers = self.customers.lock().await;
        Ok((customers.clone(), customers.len() as i64))
    }

    async fn find_customer(&self, customer_id: i32) -> AppResult<Option<Customer>> {
        let customers = self.customers.lock().await;
        Ok(customers
            .iter()
            .find(|customer| customer.customer_id() == customer_id)
            .cloned())
    }

    async fn customers_by_ids(&self, customer_ids: &[i32]) -> AppResult<Vec<Customer>> {
        let customers = self.customers.lock().await;
        Ok(customers
            .iter()
            .filter(|customer| customer_ids.contains(&customer.customer_id()))
            .cloned()
            .collect())
    }

    async fn insert_customer(&self, customer: &Customer) -> AppResult<Customer> {
        let mut customers = self.customers.lock().await;
        let next_id = customers
            .iter()
            .map(Customer::customer_id)
            .max()
            .unwrap_or(0)
            + 1;
        let stored = Customer::new(
            next_id,
            customer.company_name(),
            customer.contact_name().map(str::to_owned),
            customer.city().map(str::to_owned),
            customer.country().map(str::to_owned),
            customer.phone().map(str::to_owned),
        )?;
        customers.push(stored.clone());
        Ok(stored)
    }

    async fn update_customer(&self, customer: &Customer) -> AppResult<Option<Customer>> {
        let mut customers = self.customers.lock().await;
        let Some(slot) = customers
            .iter_mut()
            .find(|stored| stored.customer_id() == customer.customer_id())
        else {
            return Ok(None);
        };
        *slot = customer.clone();
        Ok(Some(customer.clone()))
    }

    async fn order_counts(&self, customer_ids: &[i32]) -> AppResult<Vec<(i32, i64)>> {
        let counts = self.order_counts.lock().await;
        Ok(customer_ids
            .iter()
            .filter_map(|id| counts.get(id).map(|count| (*id, *count)))
            .collect())
    }

    async fn delete_customer(&self, customer_id: i32, _detach: bool) -> AppResult<bool> {
        let mut customers = self.customers.lock().await;
        let before = customers.len();
        customers.retain(|customer| customer.customer_id() != customer_id);
        Ok(customers.len() < before)
    }
}

struct FakeOrderRepository {
    orders: Mutex<Vec<Order>>,
    details: Mutex<Vec<OrderDetail>>,
    product_prices: BTreeMap<i32, (String, Decimal)>,
}

impl FakeOrderRepository {
    fn new(product_prices: BTreeMap<i32, (String, Decimal)>) -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            details: Mutex::new(Vec::new()),
            product_prices,
        }
    }

    fn resolve_lines(&self, order_id: i32, lines: &[NewOrderDetail]) -> AppResult<Vec<OrderDetail>> {
        lines
            .iter()
            .map(|line| {
                let (_, current_price) =
                    self.product_prices.get(&line.product_id).ok_or_else(|| {
                        AppError::invalid_field(
                            "details",
                            format!("product '{}' does not exist", line.product_id),
                        )
                    })?;
                OrderDetail::new(
                    order_id,
                    line.product_id,
                    line.unit_price.unwrap_or(*current_price),
                    line.quantity,
                    line.discount,
                )
            })
            .collect()
    }
}

#[async_trait]
impl OrderRepository for FakeOrderRepository {
    async fn list_orders(&self, _spec: &QuerySpec) -> AppResult<(Vec<Order>, i64)> {
        let orders = self.orders.lock().await;
        Ok((orders.clone(), orders.len() as i64))
    }

    async fn find_order(&self, order_id: i32) -> AppResult<Option<Order>> {
        let orders = self.orders.lock().await;
        Ok(orders
            .iter()
            .find(|order| order.order_id() == order_id)
            .cloned())
    }

    async fn create_order(
        &self,
        order: &Order,
        details: &[NewOrderDetail],
    ) -> AppResult<(Order, Vec<OrderDetail>)> {
        let mut orders = self.orders.lock().await;
        let next_id = orders.iter().map(Order::order_id).max().unwrap_or(0) + 1;

        // Resolve before writing anything so a bad line leaves no rows.
        let lines = self.resolve_lines(next_id, details)?;

        let stored = Order::new(
            next_id,
            order.customer_id(),
            order.employee_id(),
            order.order_date(),
            order.required_date(),
            order.shipped_date(),
            order.ship_via(),
            order.freight(),
        )?;
        orders.push(stored.clone());
        self.details.lock().await.extend(lines.clone());
        Ok((stored, lines))
    }

    async fn update_order(
        &self,
        order: &Order,
        details: Option<&[NewOrderDetail]>,
    ) -> AppResult<Option<(Order, Vec<OrderDetail>)>> {
        let mut orders = self.orders.lock().await;
        let Some(slot) = orders
            .iter_mut()
            .find(|stored| stored.order_id() == order.order_id())
        else {
            return Ok(None);
        };
        *slot = order.clone();

        let mut stored_details = self.details.lock().await;
        if let Some(lines) = details {
            let resolved = self.resolve_lines(order.order_id(), lines)?;
            stored_details.retain(|detail| detail.order_id() != order.order_id());
            stored_details.extend(resolved);
        }

        let lines = stored_details
            .iter()
            .filter(|detail| detail.order_id() == order.order_id())
            .cloned()
            .collect();
        Ok(Some((order.clone(), lines)))
    }

    async fn delete_order(&self, order_id: i32) -> AppResult<bool> {
        let mut orders = self.orders.lock().await;
        let before = orders.len();
        orders.retain(|order| order.order_id() != order_id);
        self.details
            .lock()
            .await
            .retain(|detail| detail.order_id() != order_id);
        Ok(orders.len() < before)
    }

    async fn details_for_orders(&self, order_ids: &[i32]) -> AppResult<Vec<DetailLine>> {
        let details = self.details.lock().await;
        Ok(details
            .iter()
            .filter(|detail| order_ids.contains(&detail.order_id()))
            .map(|detail| DetailLine {
                product_name: self
                    .product_prices
                    .get(&detail.product_id())
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default(),
                detail: detail.clone(),
            })
            .collect())
    }

    async fn subtotals(&self, order_ids: &[i32]) -> AppResult<Vec<(i32, Decimal)>> {
        let details = self.details.lock().await;
        Ok(order_ids
            .iter()
            .map(|order_id| {
                let subtotal = details
                    .iter()
                    .filter(|detail| detail.order_id() == *order_id)
                    .map(OrderDetail::line_total)
                    .sum();
                (*order_id, subtotal)
            })
            .collect())
    }
}

#[derive(Default)]
struct FakeShipperRepository {
    shippers: Mutex<Vec<Shipper>>,
}

#[async_trait]
impl ShipperRepository for FakeShipperRepository {
    async fn list_shippers(&self, _spec: &QuerySpec) -> AppResult<(Vec<Shipper>, i64)> {
        let shippers = self.shippers.lock().await;
        Ok((shippers.clone(), shippers.len() as i64))
    }

    async fn find_shipper(&self, shipper_id: i32) -> AppResult<Option<Shipper>> {
        let shippers = self.shippers.lock().await;
        Ok(shippers
            .iter()
            .find(|shipper| shipper.shipper_id() == shipper_id)
            .cloned())
    }

    async fn shippers_by_ids(&self, shipper_ids: &[i32]) -> AppResult<Vec<Shipper>> {
        let shippers = self.shippers.lock().await;
        Ok(shippers
            .iter()
            .filter(|shipper| shipper_ids.contains(&shipper.shipper_id()))
            .cloned()
            .collect())
    }

    async fn insert_shipper(&self, shipper: &Shipper) -> AppResult<Shipper> {
        let mut shippers = self.shippers.lock().await;
        let next_id = shippers.iter().map(Shipper::shipper_id).max().unwrap_or(0) + 1;
        let stored = Shipper::new(
            next_id,
            shipper.company_name(),
            shipper.phone().map(str::to_owned),
        )?;
        shippers.push(stored.clone());
        Ok(stored)
    }

    async fn update_shipper(&self, shipper: &Shipper) -> AppResult<Option<Shipper>> {
        let mut shippers = self.shippers.lock().await;
        let Some(slot) = shippers
            .iter_mut()
            .find(|stored| stored.shipper_id() == shipper.shipper_id())
        else {
            return Ok(None);
        };
        *slot = shipper.clone();
        Ok(Some(shipper.clone()))
    }

    async fn order_counts(&self, _shipper_ids: &[i32]) -> AppResult<Vec<(i32, i64)>> {
        Ok(Vec::new())
    }

    async fn delete_shipper(&self, shipper_id: i32, _detach: bool) -> AppResult<bool> {
        let mut shippers = self.shippers.lock().await;
        let before = shippers.len();
        shippers.retain(|shipper| shipper.shipper_id() != shipper_id);
        Ok(shippers.len() < before)
    }
}

#[derive(Default)]
struct NoopEmployeeRepository;

#[async_trait]
impl EmployeeRepository for NoopEmployeeRepository {
    async fn list_employees(&self, _spec: &QuerySpec) -> AppResult<(Vec<Employee>, i64)> {
        Ok((Vec::new(), 0))
    }

    async fn find_employee(&self, _employee_id: i32) -> AppResult<Option<Employee>> {
        Ok(None)
    }

    async fn employees_by_ids(&self, _employee_ids: &[i32]) -> AppResult<Vec<Employee>> {
        Ok(Vec::new())
    }

    async fn all_employees(&self) -> AppResult<Vec<Employee>> {
        Ok(Vec::new())
    }

    async fn insert_employee(&self, _employee: &Employee) -> AppResult<Employee> {
        Err(AppError::Internal("not supported".to_owned()))
    }

    async fn update_employee(&self, _employee: &Employee) -> AppResult<Option<Employee>> {
        Ok(None)
    }

    async fn count_orders_taken(&self, _employee_id: i32) -> AppResult<i64> {
        Ok(0)
    }

    async fn count_direct_reports(&self, _employee_id: i32) -> AppResult<i64> {
        Ok(0)
    }

    async fn delete_employee(&self, _employee_id: i32, _detach: bool) -> AppResult<bool> {
        Ok(false)
    }
}

struct Fixture {
    service: SalesService,
    customers: Arc<FakeCustomerRepository>,
    orders: Arc<FakeOrderRepository>,
}

async fn fixture() -> Fixture {
    let customers = Arc::new(FakeCustomerRepository::default());
    let orders = Arc::new(FakeOrderRepository::new(BTreeMap::from([
        (1, ("Chai".to_owned(), dec!(18.00))),
        (2, ("Chang".to_owned(), dec!(19.00))),
    ])));
    let shippers = Arc::new(FakeShipperRepository::default());

    customers.customers.lock().await.push(
        Customer::new(
            1,
            "Alfreds Futterkiste",
            Some("Maria Anders".to_owned()),
            Some("Berlin".to_owned()),
            Some("Germany".to_owned()),
            None,
        )
        .unwrap_or_else(|_| unreachable!()),
    );

    let service = SalesService::new(
        Arc::new(SchemaRegistry::northwind()),
        customers.clone(),
        orders.clone(),
        shippers,
        Arc::new(NoopEmployeeRepository),
    );

    Fixture {
        service,
        customers,
        orders,
    }
}

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

fn new_order(details: Vec<NewOrderDetail>) -> CreateOrder {
    CreateOrder {
        customer_id: Some(1),
        employee_id: None,
        order_date: NaiveDate::from_ymd_opt(2024, 1, 5),
        required_date: NaiveDate::from_ymd_opt(2024, 1, 20),
        shipped_date: None,
        ship_via: None,
        freight: dec!(4.50),
        details,
    }
}

#[tokio::test]
async fn create_order_writes_header_and_lines_with_exact_totals() {
    let fixture = fixture().await;
    let view = fixture
        .service
        .create_order(new_order(vec![
            NewOrderDetail {
                product_id: 1,
                unit_price: Some(dec!(10.00)),
                quantity: 3,
                discount: dec!(0.10),
            },
            NewOrderDetail {
                product_id: 2,
                unit_price: None,
                quantity: 1,
                discount: dec!(0),
            },
        ]))
        .await
        .unwrap_or_else(|_| unreachable!());

    // 10.00 * 3 * 0.9 + the product's captured price of 19.00.
    assert_eq!(view.subtotal, dec!(46.00));
    assert_eq!(view.total, dec!(50.50));
    assert_eq!(view.details.as_deref().map(<[_]>::len), Some(2));
    assert_eq!(fixture.orders.details.lock().await.len(), 2);
}

#[tokio::test]
async fn create_order_reports_every_bad_line_field_before_writing() {
    let fixture = fixture().await;
    let result = fixture
        .service
        .create_order(new_order(vec![NewOrderDetail {
            product_id: 1,
            unit_price: Some(dec!(-1)),
            quantity: 0,
            discount: dec!(1.5),
        }]))
        .await;

    match result {
        Err(AppError::Validation(violations)) => assert_eq!(violations.len(), 3),
        _ => panic!("expected a validation failure"),
    }
    assert!(fixture.orders.orders.lock().await.is_empty());
}

#[tokio::test]
async fn create_order_requires_at_least_one_line() {
    let fixture = fixture().await;
    let result = fixture.service.create_order(new_order(Vec::new())).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn create_order_with_an_unknown_product_leaves_no_rows() {
    let fixture = fixture().await;
    let result = fixture
        .service
        .create_order(new_order(vec![NewOrderDetail {
            product_id: 99,
            unit_price: None,
            quantity: 1,
            discount: dec!(0),
        }]))
        .await;

    assert!(result.is_err());
    assert!(fixture.orders.orders.lock().await.is_empty());
    assert!(fixture.orders.details.lock().await.is_empty());
}

#[tokio::test]
async fn list_orders_attaches_status_and_store_computed_subtotals() {
    let fixture = fixture().await;
    fixture
        .service
        .create_order(new_order(vec![NewOrderDetail {
            product_id: 1,
            unit_price: Some(dec!(10.00)),
            quantity: 2,
            discount: dec!(0),
        }]))
        .await
        .unwrap_or_else(|_| unreachable!());

    let page = fixture
        .service
        .list_orders(&params(&[("includeDetails", "true")]))
        .await
        .unwrap_or_else(|_| unreachable!());

    let view = &page.items()[0];
    assert_eq!(view.status, OrderStatus::Overdue);
    assert_eq!(view.subtotal, dec!(20.00));
    assert_eq!(view.total, dec!(24.50));
    assert!(view.details.is_some());
}

#[tokio::test]
async fn update_order_replaces_lines_only_when_supplied() {
    let fixture = fixture().await;
    let created = fixture
        .service
        .create_order(new_order(vec![NewOrderDetail {
            product_id: 1,
            unit_price: Some(dec!(10.00)),
            quantity: 2,
            discount: dec!(0),
        }]))
        .await
        .unwrap_or_else(|_| unreachable!());
    let order_id = created.order.order_id();

    // Header-only patch keeps the stored lines.
    let view = fixture
        .service
        .update_order(
            order_id,
            UpdateOrder {
                freight: Some(dec!(9.00)),
                ..UpdateOrder::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(view.subtotal, dec!(20.00));
    assert_eq!(view.total, dec!(29.00));

    // Supplying lines replaces them atomically.
    let view = fixture
        .service
        .update_order(
            order_id,
            UpdateOrder {
                details: Some(vec![NewOrderDetail {
                    product_id: 2,
                    unit_price: None,
                    quantity: 1,
                    discount: dec!(0),
                }]),
                ..UpdateOrder::default()
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(view.subtotal, dec!(19.00));
    assert_eq!(fixture.orders.details.lock().await.len(), 1);
}

#[tokio::test]
async fn delete_order_removes_the_whole_aggregate() {
    let fixture = fixture().await;
    let created = fixture
        .service
        .create_order(new_order(vec![NewOrderDetail {
            product_id: 1,
            unit_price: Some(dec!(10.00)),
            quantity: 2,
            discount: dec!(0),
        }]))
        .await
        .unwrap_or_else(|_| unreachable!());

    fixture
        .service
        .delete_order(created.order.order_id())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(fixture.orders.orders.lock().await.is_empty());
    assert!(fixture.orders.details.lock().await.is_empty());

    let result = fixture.service.delete_order(999).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn delete_customer_with_orders_requires_force() {
    let fixture = fixture().await;
    fixture.customers.order_counts.lock().await.insert(1, 6);

    let result = fixture.service.delete_customer(1, false).await;
    match result {
        Err(AppError::DependencyConflict { dependents, .. }) => assert_eq!(dependents, 6),
        _ => panic!("expected a dependency conflict"),
    }

    assert!(fixture.service.delete_customer(1, true).await.is_ok());
}
