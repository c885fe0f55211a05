use super::*;

impl CatalogService {
    /// Lists categories with their product counts attached in one grouped
    /// query.
    pub async fn list_categories(
        &self,
        params: &BTreeMap<String, String>,
    ) -> AppResult<Page<CategoryView>> {
        let schema = self.registry.schema("categories")?;
        let spec = build_query_spec(schema, params, today())?;
        let (categories, total) = self.categories.list_categories(&spec).await?;

        let ids = distinct_ids(categories.iter().map(Category::category_id));
        let counts = self.categories.product_counts(&ids).await?;

        let items = categories
            .into_iter()
            .map(|category| {
                let product_count = count_for(&counts, category.category_id());
                CategoryView {
                    category,
                    product_count,
                }
            })
            .collect();

        Ok(Page::new(items, total, &spec))
    }

    /// Gets one category with its product count.
    pub async fn get_category(&self, category_id: i32) -> AppResult<CategoryView> {
        let category = self
            .categories
            .find_category(category_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("category '{category_id}' does not exist"))
            })?;

        let counts = self.categories.product_counts(&[category_id]).await?;
        Ok(CategoryView {
            product_count: count_for(&counts, category_id),
            category,
        })
    }

    /// Creates a category; a duplicate name surfaces as a duplicate-key
    /// failure.
    pub async fn create_category(&self, input: CreateCategory) -> AppResult<CategoryView> {
        let draft = Category::new(0, input.category_name, input.description)?;
        let created = self.categories.insert_category(&draft).await?;
        Ok(CategoryView {
            category: created,
            product_count: 0,
        })
    }

    /// Applies a partial update to a category.
    pub async fn update_category(
        &self,
        category_id: i32,
        patch: UpdateCategory,
    ) -> AppResult<CategoryView> {
        let existing = self
            .categories
            .find_category(category_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("category '{category_id}' does not exist"))
            })?;

        let merged = Category::new(
            category_id,
            patch
                .category_name
                .unwrap_or_else(|| existing.category_name().to_owned()),
            patch
                .description
                .unwrap_or_else(|| existing.description().map(str::to_owned)),
        )?;

        let updated = self
            .categories
            .update_category(&merged)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("category '{category_id}' does not exist"))
            })?;

        let counts = self.categories.product_counts(&[category_id]).await?;
        Ok(CategoryView {
            product_count: count_for(&counts, category_id),
            category: updated,
        })
    }

    /// Deletes a category; products filed under it block the delete unless
    /// `force` detaches them first.
    pub async fn delete_category(&self, category_id: i32, force: bool) -> AppResult<()> {
        let category = self
            .categories
            .find_category(category_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("category '{category_id}' does not exist"))
            })?;

        let counts = self.categories.product_counts(&[category_id]).await?;
        let dependents = count_for(&counts, category_id);
        if dependents > 0 && !force {
            return Err(AppError::DependencyConflict {
                message: format!(
                    "category '{}' still has products filed under it",
                    category.category_name()
                ),
                dependents,
            });
        }

        let deleted = self.categories.delete_category(category_id, force).await?;
        if !deleted {
            return Err(AppError::NotFound(format!(
                "category '{category_id}' does not exist"
            )));
        }

        Ok(())
    }
}
