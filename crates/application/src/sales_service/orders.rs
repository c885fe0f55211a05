use super::*;

impl SalesService {
    /// Lists orders with derived status, totals, and requested relations.
    pub async fn list_orders(
        &self,
        params: &BTreeMap<String, String>,
    ) -> AppResult<Page<OrderView>> {
        let schema = self.registry.schema("orders")?;
        let spec = build_query_spec(schema, params, today())?;
        let (orders, total) = self.orders.list_orders(&spec).await?;

        let mut includes = BTreeSet::new();
        for relation in ["customer", "employee", "shipper", "details"] {
            if spec.includes(relation) {
                includes.insert(relation.to_owned());
            }
        }

        let items = self.assemble_views(orders, &includes, spec.as_of()).await?;
        Ok(Page::new(items, total, &spec))
    }

    /// Gets one order with derived fields and requested relations.
    pub async fn get_order(
        &self,
        order_id: i32,
        params: &BTreeMap<String, String>,
    ) -> AppResult<OrderView> {
        let schema = self.registry.schema("orders")?;
        let includes = build_include_set(schema, params)?;

        let order = self
            .orders
            .find_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("order '{order_id}' does not exist")))?;

        let mut views = self.assemble_views(vec![order], &includes, today()).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("order view assembly lost the order".to_owned()))
    }

    /// Creates an order aggregate: header plus lines, all-or-nothing.
    pub async fn create_order(&self, input: CreateOrder) -> AppResult<OrderView> {
        let mut violations = Violations::new();
        if input.details.is_empty() {
            violations.push("details", "must contain at least one line");
        }
        check_detail_lines(&input.details, &mut violations);

        let order = match Order::new(
            0,
            input.customer_id,
            input.employee_id,
            input.order_date,
            input.required_date,
            input.shipped_date,
            input.ship_via,
            input.freight,
        ) {
            Ok(order) => Some(order),
            Err(AppError::Validation(entries)) => {
                violations.extend(entries);
                None
            }
            Err(other) => return Err(other),
        };

        let order = violations.into_result(order)?.ok_or_else(|| {
            AppError::Internal("order header validation produced no order".to_owned())
        })?;

        let (created, details) = self.orders.create_order(&order, &input.details).await?;
        self.view_for_written_order(created, details).await
    }

    /// Applies a partial update to an order; supplied lines replace the
    /// stored ones in the same transaction.
    pub async fn update_order(&self, order_id: i32, patch: UpdateOrder) -> AppResult<OrderView> {
        let existing = self
            .orders
            .find_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("order '{order_id}' does not exist")))?;

        let mut violations = Violations::new();
        if let Some(details) = &patch.details {
            if details.is_empty() {
                violations.push("details", "must contain at least one line");
            }
            check_detail_lines(details, &mut violations);
        }

        let merged = match Order::new(
            order_id,
            patch.customer_id.unwrap_or_else(|| existing.customer_id()),
            patch.employee_id.unwrap_or_else(|| existing.employee_id()),
            patch.order_date.unwrap_or_else(|| existing.order_date()),
            patch
                .required_date
                .unwrap_or_else(|| existing.required_date()),
            patch
                .shipped_date
                .unwrap_or_else(|| existing.shipped_date()),
            patch.ship_via.unwrap_or_else(|| existing.ship_via()),
            patch.freight.unwrap_or_else(|| existing.freight()),
        ) {
            Ok(order) => Some(order),
            Err(AppError::Validation(entries)) => {
                violations.extend(entries);
                None
            }
            Err(other) => return Err(other),
        };

        let merged = violations.into_result(merged)?.ok_or_else(|| {
            AppError::Internal("order header validation produced no order".to_owned())
        })?;

        let (updated, details) = self
            .orders
            .update_order(&merged, patch.details.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("order '{order_id}' does not exist")))?;

        self.view_for_written_order(updated, details).await
    }

    /// Deletes an order and its owned lines atomically.
    pub async fn delete_order(&self, order_id: i32) -> AppResult<()> {
        let deleted = self.orders.delete_order(order_id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "order '{order_id}' does not exist"
            )));
        }

        Ok(())
    }

    async fn view_for_written_order(
        &self,
        order: Order,
        details: Vec<OrderDetail>,
    ) -> AppResult<OrderView> {
        let order_id = order.order_id();
        let lines = self.orders.details_for_orders(&[order_id]).await?;
        let subtotal: Decimal = details.iter().map(OrderDetail::line_total).sum();

        Ok(OrderView {
            status: order.status_on(today()),
            subtotal,
            total: subtotal + order.freight(),
            customer: None,
            employee: None,
            shipper: None,
            details: Some(
                lines
                    .into_iter()
                    .map(|line| DetailView {
                        line_total: line.detail.line_total(),
                        product_name: line.product_name,
                        detail: line.detail,
                    })
                    .collect(),
            ),
            order,
        })
    }

    /// Shapes fetched orders into views, batching every relation and
    /// aggregate lookup so nothing runs per row.
    async fn assemble_views(
        &self,
        orders: Vec<Order>,
        includes: &BTreeSet<String>,
        as_of: chrono::NaiveDate,
    ) -> AppResult<Vec<OrderView>> {
        let order_ids = distinct_ids(orders.iter().map(Order::order_id));
        let subtotals = self.orders.subtotals(&order_ids).await?;

        let customers = if includes.contains("customer") {
            let ids = distinct_ids(orders.iter().filter_map(Order::customer_id));
            index_by(
                self.customers.customers_by_ids(&ids).await?,
                Customer::customer_id,
            )
        } else {
            BTreeMap::new()
        };

        let employees = if includes.contains("employee") {
            let ids = distinct_ids(orders.iter().filter_map(Order::employee_id));
            index_by(
                self.employees.employees_by_ids(&ids).await?,
                Employee::employee_id,
            )
        } else {
            BTreeMap::new()
        };

        let shippers = if includes.contains("shipper") {
            let ids = distinct_ids(orders.iter().filter_map(Order::ship_via));
            index_by(
                self.shippers.shippers_by_ids(&ids).await?,
                Shipper::shipper_id,
            )
        } else {
            BTreeMap::new()
        };

        let mut details_by_order: BTreeMap<i32, Vec<DetailView>> = BTreeMap::new();
        let include_details = includes.contains("details");
        if include_details {
            for line in self.orders.details_for_orders(&order_ids).await? {
                details_by_order
                    .entry(line.detail.order_id())
                    .or_default()
                    .push(DetailView {
                        line_total: line.detail.line_total(),
                        product_name: line.product_name,
                        detail: line.detail,
                    });
            }
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let order_id = order.order_id();
                let subtotal = subtotals
                    .iter()
                    .find(|(id, _)| *id == order_id)
                    .map(|(_, subtotal)| *subtotal)
                    .unwrap_or(Decimal::ZERO);

                OrderView {
                    status: order.status_on(as_of),
                    subtotal,
                    total: subtotal + order.freight(),
                    customer: order
                        .customer_id()
                        .and_then(|id| customers.get(&id).cloned()),
                    employee: order
                        .employee_id()
                        .and_then(|id| employees.get(&id).cloned()),
                    shipper: order.ship_via().and_then(|id| shippers.get(&id).cloned()),
                    details: include_details
                        .then(|| details_by_order.remove(&order_id).unwrap_or_default()),
                    order,
                }
            })
            .collect())
    }
}
