use northwind_application::{CategoryView, CreateCategory, UpdateCategory};
use northwind_domain::Category;
use serde::{Deserialize, Serialize};

use super::common::double_option;

/// Bare category record, used when attached as a relation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub category_id: i32,
    pub category_name: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryRecord {
    fn from(category: Category) -> Self {
        Self {
            category_id: category.category_id(),
            category_name: category.category_name().to_owned(),
            description: category.description().map(str::to_owned),
        }
    }
}

/// Category payload with its derived product count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub category_id: i32,
    pub category_name: String,
    pub description: Option<String>,
    pub product_count: i64,
}

impl From<CategoryView> for CategoryResponse {
    fn from(view: CategoryView) -> Self {
        Self {
            category_id: view.category.category_id(),
            category_name: view.category.category_name().to_owned(),
            description: view.category.description().map(str::to_owned),
            product_count: view.product_count,
        }
    }
}

/// Create-category request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub category_name: String,
    pub description: Option<String>,
}

impl From<CreateCategoryRequest> for CreateCategory {
    fn from(request: CreateCategoryRequest) -> Self {
        Self {
            category_name: request.category_name,
            description: request.description,
        }
    }
}

/// Partial update request body for a category.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

impl From<UpdateCategoryRequest> for UpdateCategory {
    fn from(request: UpdateCategoryRequest) -> Self {
        Self {
            category_name: request.category_name,
            description: request.description,
        }
    }
}
