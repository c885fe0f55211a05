use super::*;

impl CatalogService {
    /// Lists products with derived fields and requested relations.
    pub async fn list_products(
        &self,
        params: &BTreeMap<String, String>,
    ) -> AppResult<Page<ProductView>> {
        let schema = self.registry.schema("products")?;
        let spec = build_query_spec(schema, params, today())?;
        let (products, total) = self.products.list_products(&spec).await?;

        let categories = if spec.includes("category") {
            let ids = distinct_ids(products.iter().filter_map(Product::category_id));
            index_by(
                self.categories.categories_by_ids(&ids).await?,
                Category::category_id,
            )
        } else {
            BTreeMap::new()
        };

        let suppliers = if spec.includes("supplier") {
            let ids = distinct_ids(products.iter().filter_map(Product::supplier_id));
            index_by(
                self.suppliers.suppliers_by_ids(&ids).await?,
                Supplier::supplier_id,
            )
        } else {
            BTreeMap::new()
        };

        let items = products
            .into_iter()
            .map(|product| {
                let category = product
                    .category_id()
                    .and_then(|id| categories.get(&id).cloned());
                let supplier = product
                    .supplier_id()
                    .and_then(|id| suppliers.get(&id).cloned());
                ProductView::from_parts(product, category, supplier)
            })
            .collect();

        Ok(Page::new(items, total, &spec))
    }

    /// Gets one product with derived fields and requested relations.
    pub async fn get_product(
        &self,
        product_id: i32,
        params: &BTreeMap<String, String>,
    ) -> AppResult<ProductView> {
        let schema = self.registry.schema("products")?;
        let includes = build_include_set(schema, params)?;

        let product = self
            .products
            .find_product(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product '{product_id}' does not exist")))?;

        let category = if includes.contains("category") {
            match product.category_id() {
                Some(id) => self.categories.find_category(id).await?,
                None => None,
            }
        } else {
            None
        };

        let supplier = if includes.contains("supplier") {
            match product.supplier_id() {
                Some(id) => self.suppliers.find_supplier(id).await?,
                None => None,
            }
        } else {
            None
        };

        Ok(ProductView::from_parts(product, category, supplier))
    }

    /// Creates a product after validating every field.
    pub async fn create_product(&self, input: CreateProduct) -> AppResult<ProductView> {
        let draft = Product::new(
            0,
            input.product_name,
            input.supplier_id,
            input.category_id,
            input.quantity_per_unit,
            input.unit_price,
            input.units_in_stock,
            input.units_on_order,
            input.reorder_level,
            input.discontinued,
        )?;

        let created = self.products.insert_product(&draft).await?;
        Ok(ProductView::from_parts(created, None, None))
    }

    /// Applies a partial update to a product.
    pub async fn update_product(
        &self,
        product_id: i32,
        patch: UpdateProduct,
    ) -> AppResult<ProductView> {
        let existing = self
            .products
            .find_product(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product '{product_id}' does not exist")))?;

        let merged = Product::new(
            product_id,
            patch
                .product_name
                .unwrap_or_else(|| existing.product_name().to_owned()),
            patch.supplier_id.unwrap_or_else(|| existing.supplier_id()),
            patch.category_id.unwrap_or_else(|| existing.category_id()),
            patch
                .quantity_per_unit
                .unwrap_or_else(|| existing.quantity_per_unit().map(str::to_owned)),
            patch.unit_price.unwrap_or_else(|| existing.unit_price()),
            patch.units_in_stock.unwrap_or(existing.units_in_stock()),
            patch.units_on_order.unwrap_or(existing.units_on_order()),
            patch.reorder_level.unwrap_or(existing.reorder_level()),
            patch.discontinued.unwrap_or(existing.discontinued()),
        )?;

        let updated = self
            .products
            .update_product(&merged)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product '{product_id}' does not exist")))?;

        Ok(ProductView::from_parts(updated, None, None))
    }

    /// Deletes a product; order lines referencing it block the delete
    /// unless `force` cascades them.
    pub async fn delete_product(&self, product_id: i32, force: bool) -> AppResult<()> {
        let product = self
            .products
            .find_product(product_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product '{product_id}' does not exist")))?;

        let dependents = self.products.count_order_lines(product_id).await?;
        if dependents > 0 && !force {
            return Err(AppError::DependencyConflict {
                message: format!(
                    "product '{}' is referenced by existing order lines",
                    product.product_name()
                ),
                dependents,
            });
        }

        let deleted = self.products.delete_product(product_id, force).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "product '{product_id}' does not exist"
            )));
        }

        Ok(())
    }
}
