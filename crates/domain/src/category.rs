use northwind_core::{AppResult, Violations};

/// A product category row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    category_id: i32,
    category_name: String,
    description: Option<String>,
}

impl Category {
    /// Creates a validated category.
    pub fn new(
        category_id: i32,
        category_name: impl Into<String>,
        description: Option<String>,
    ) -> AppResult<Self> {
        let category_name = category_name.into();
        let mut violations = Violations::new();

        if category_name.trim().is_empty() {
            violations.push("categoryName", "is required");
        } else if category_name.len() > 15 {
            violations.push("categoryName", "must be at most 15 characters");
        }

        violations.into_result(Self {
            category_id,
            category_name,
            description,
        })
    }

    /// Returns the category identifier.
    #[must_use]
    pub fn category_id(&self) -> i32 {
        self.category_id
    }

    /// Returns the unique category name.
    #[must_use]
    pub fn category_name(&self) -> &str {
        self.category_name.as_str()
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn category_name_is_required() {
        assert!(Category::new(1, "", None).is_err());
    }

    #[test]
    fn category_name_is_bounded() {
        assert!(Category::new(1, "Dairy Products!!", None).is_err());
        assert!(Category::new(1, "Dairy Products", None).is_ok());
    }
}
