use super::*;

impl SalesService {
    /// Lists shippers with their order counts attached.
    pub async fn list_shippers(
        &self,
        params: &BTreeMap<String, String>,
    ) -> AppResult<Page<ShipperView>> {
        let schema = self.registry.schema("shippers")?;
        let spec = build_query_spec(schema, params, today())?;
        let (shippers, total) = self.shippers.list_shippers(&spec).await?;

        let ids = distinct_ids(shippers.iter().map(Shipper::shipper_id));
        let counts = self.shippers.order_counts(&ids).await?;

        let items = shippers
            .into_iter()
            .map(|shipper| {
                let order_count = count_for(&counts, shipper.shipper_id());
                ShipperView {
                    shipper,
                    order_count,
                }
            })
            .collect();

        Ok(Page::new(items, total, &spec))
    }

    /// Gets one shipper with their order count.
    pub async fn get_shipper(&self, shipper_id: i32) -> AppResult<ShipperView> {
        let shipper = self
            .shippers
            .find_shipper(shipper_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("shipper '{shipper_id}' does not exist")))?;

        let counts = self.shippers.order_counts(&[shipper_id]).await?;
        Ok(ShipperView {
            order_count: count_for(&counts, shipper_id),
            shipper,
        })
    }

    /// Creates a shipper.
    pub async fn create_shipper(&self, input: CreateShipper) -> AppResult<ShipperView> {
        let draft = Shipper::new(0, input.company_name, input.phone)?;
        let created = self.shippers.insert_shipper(&draft).await?;
        Ok(ShipperView {
            shipper: created,
            order_count: 0,
        })
    }

    /// Applies a partial update to a shipper.
    pub async fn update_shipper(
        &self,
        shipper_id: i32,
        patch: UpdateShipper,
    ) -> AppResult<ShipperView> {
        let existing = self
            .shippers
            .find_shipper(shipper_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("shipper '{shipper_id}' does not exist")))?;

        let merged = Shipper::new(
            shipper_id,
            patch
                .company_name
                .unwrap_or_else(|| existing.company_name().to_owned()),
            patch.phone.unwrap_or_else(|| existing.phone().map(str::to_owned)),
        )?;

        let updated = self
            .shippers
            .update_shipper(&merged)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("shipper '{shipper_id}' does not exist")))?;

        let counts = self.shippers.order_counts(&[shipper_id]).await?;
        Ok(ShipperView {
            order_count: count_for(&counts, shipper_id),
            shipper: updated,
        })
    }

    /// Deletes a shipper; carried orders block the delete unless `force`
    /// detaches them first.
    pub async fn delete_shipper(&self, shipper_id: i32, force: bool) -> AppResult<()> {
        let shipper = self
            .shippers
            .find_shipper(shipper_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("shipper '{shipper_id}' does not exist")))?;

        let counts = self.shippers.order_counts(&[shipper_id]).await?;
        let dependents = count_for(&counts, shipper_id);
        if dependents > 0 && !force {
            return Err(AppError::DependencyConflict {
                message: format!(
                    "shipper '{}' still has orders on record",
                    shipper.company_name()
                ),
                dependents,
            });
        }

        let deleted = self.shippers.delete_shipper(shipper_id, force).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "shipper '{shipper_id}' does not exist"
            )));
        }

        Ok(())
    }
}
