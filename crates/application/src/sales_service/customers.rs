use super::*;

impl SalesService {
    /// Lists customers with their order counts attached in one grouped
    /// query.
    pub async fn list_customers(
        &self,
        params: &BTreeMap<String, String>,
    ) -> AppResult<Page<CustomerView>> {
        let schema = self.registry.schema("customers")?;
        let spec = build_query_spec(schema, params, today())?;
        let (customers, total) = self.customers.list_customers(&spec).await?;

        let ids = distinct_ids(customers.iter().map(Customer::customer_id));
        let counts = self.customers.order_counts(&ids).await?;

        let items = customers
            .into_iter()
            .map(|customer| {
                let order_count = count_for(&counts, customer.customer_id());
                CustomerView {
                    customer,
                    order_count,
                }
            })
            .collect();

        Ok(Page::new(items, total, &spec))
    }

    /// Gets one customer with their order count.
    pub async fn get_customer(&self, customer_id: i32) -> AppResult<CustomerView> {
        let customer = self
            .customers
            .find_customer(customer_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("customer '{customer_id}' does not exist"))
            })?;

        let counts = self.customers.order_counts(&[customer_id]).await?;
        Ok(CustomerView {
            order_count: count_for(&counts, customer_id),
            customer,
        })
    }

    /// Creates a customer.
    pub async fn create_customer(&self, input: CreateCustomer) -> AppResult<CustomerView> {
        let draft = Customer::new(
            0,
            input.company_name,
            input.contact_name,
            input.city,
            input.country,
            input.phone,
        )?;
        let created = self.customers.insert_customer(&draft).await?;
        Ok(CustomerView {
            customer: created,
            order_count: 0,
        })
    }

    /// Applies a partial update to a customer.
    pub async fn update_customer(
        &self,
        customer_id: i32,
        patch: UpdateCustomer,
    ) -> AppResult<CustomerView> {
        let existing = self
            .customers
            .find_customer(customer_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("customer '{customer_id}' does not exist"))
            })?;

        let merged = Customer::new(
            customer_id,
            patch
                .company_name
                .unwrap_or_else(|| existing.company_name().to_owned()),
            patch
                .contact_name
                .unwrap_or_else(|| existing.contact_name().map(str::to_owned)),
            patch.city.unwrap_or_else(|| existing.city().map(str::to_owned)),
            patch
                .country
                .unwrap_or_else(|| existing.country().map(str::to_owned)),
            patch.phone.unwrap_or_else(|| existing.phone().map(str::to_owned)),
        )?;

        let updated = self
            .customers
            .update_customer(&merged)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("customer '{customer_id}' does not exist"))
            })?;

        let counts = self.customers.order_counts(&[customer_id]).await?;
        Ok(CustomerView {
            order_count: count_for(&counts, customer_id),
            customer: updated,
        })
    }

    /// Deletes a customer; placed orders block the delete unless `force`
    /// detaches them first.
    pub async fn delete_customer(&self, customer_id: i32, force: bool) -> AppResult<()> {
        let customer = self
            .customers
            .find_customer(customer_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("customer '{customer_id}' does not exist"))
            })?;

        let counts = self.customers.order_counts(&[customer_id]).await?;
        let dependents = count_for(&counts, customer_id);
        if dependents > 0 && !force {
            return Err(AppError::DependencyConflict {
                message: format!(
                    "customer '{}' still has orders on record",
                    customer.company_name()
                ),
                dependents,
            });
        }

        let deleted = self.customers.delete_customer(customer_id, force).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "customer '{customer_id}' does not exist"
            )));
        }

        Ok(())
    }
}
