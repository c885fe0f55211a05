use super::*;

impl CatalogService {
    /// Lists suppliers with their product counts attached.
    pub async fn list_suppliers(
        &self,
        params: &BTreeMap<String, String>,
    ) -> AppResult<Page<SupplierView>> {
        let schema = self.registry.schema("suppliers")?;
        let spec = build_query_spec(schema, params, today())?;
        let (suppliers, total) = self.suppliers.list_suppliers(&spec).await?;

        let ids = distinct_ids(suppliers.iter().map(Supplier::supplier_id));
        let counts = self.suppliers.product_counts(&ids).await?;

        let items = suppliers
            .into_iter()
            .map(|supplier| {
                let product_count = count_for(&counts, supplier.supplier_id());
                SupplierView {
                    supplier,
                    product_count,
                }
            })
            .collect();

        Ok(Page::new(items, total, &spec))
    }

    /// Gets one supplier with its product count.
    pub async fn get_supplier(&self, supplier_id: i32) -> AppResult<SupplierView> {
        let supplier = self
            .suppliers
            .find_supplier(supplier_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("supplier '{supplier_id}' does not exist"))
            })?;

        let counts = self.suppliers.product_counts(&[supplier_id]).await?;
        Ok(SupplierView {
            product_count: count_for(&counts, supplier_id),
            supplier,
        })
    }

    /// Creates a supplier.
    pub async fn create_supplier(&self, input: CreateSupplier) -> AppResult<SupplierView> {
        let draft = Supplier::new(
            0,
            input.company_name,
            input.contact_name,
            input.city,
            input.country,
            input.phone,
        )?;
        let created = self.suppliers.insert_supplier(&draft).await?;
        Ok(SupplierView {
            supplier: created,
            product_count: 0,
        })
    }

    /// Applies a partial update to a supplier.
    pub async fn update_supplier(
        &self,
        supplier_id: i32,
        patch: UpdateSupplier,
    ) -> AppResult<SupplierView> {
        let existing = self
            .suppliers
            .find_supplier(supplier_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("supplier '{supplier_id}' does not exist"))
            })?;

        let merged = Supplier::new(
            supplier_id,
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
            .suppliers
            .update_supplier(&merged)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("supplier '{supplier_id}' does not exist"))
            })?;

        let counts = self.suppliers.product_counts(&[supplier_id]).await?;
        Ok(SupplierView {
            product_count: count_for(&counts, supplier_id),
            supplier: updated,
        })
    }

    /// Deletes a supplier; sourced products block the delete unless
    /// `force` detaches them first.
    pub async fn delete_supplier(&self, supplier_id: i32, force: bool) -> AppResult<()> {
        let supplier = self
            .suppliers
            .find_supplier(supplier_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("supplier '{supplier_id}' does not exist"))
            })?;

        let counts = self.suppliers.product_counts(&[supplier_id]).await?;
        let dependents = count_for(&counts, supplier_id);
        if dependents > 0 && !force {
            return Err(AppError::DependencyConflict {
                message: format!(
                    "supplier '{}' still has products sourced from it",
                    supplier.company_name()
                ),
                dependents,
            });
        }

        let deleted = self.suppliers.delete_supplier(supplier_id, force).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "supplier '{supplier_id}' does not exist"
            )));
        }

        Ok(())
    }
}
