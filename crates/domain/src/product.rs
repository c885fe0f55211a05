use northwind_core::{AppResult, Violations};
use rust_decimal::Decimal;

/// Stock classification derived from already-fetched product fields.
///
/// The ladder is strict precedence: a discontinued product is always
/// `Discontinued` no matter how many units are on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    /// Product is discontinued.
    Discontinued,
    /// No units on hand.
    OutOfStock,
    /// Units on hand at or below the reorder level.
    ReorderRequired,
    /// Fewer than ten units on hand.
    LowStock,
    /// Healthy stock level.
    InStock,
}

impl StockStatus {
    /// Classifies stock by the canonical precedence ladder.
    #[must_use]
    pub fn classify(discontinued: bool, units_in_stock: i16, reorder_level: i16) -> Self {
        if discontinued {
            Self::Discontinued
        } else if units_in_stock == 0 {
            Self::OutOfStock
        } else if reorder_level > 0 && units_in_stock <= reorder_level {
            Self::ReorderRequired
        } else if units_in_stock < 10 {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    /// Returns the display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discontinued => "Discontinued",
            Self::OutOfStock => "Out of Stock",
            Self::ReorderRequired => "Reorder Required",
            Self::LowStock => "Low Stock",
            Self::InStock => "In Stock",
        }
    }
}

/// A catalog product row.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    product_id: i32,
    product_name: String,
    supplier_id: Option<i32>,
    category_id: Option<i32>,
    quantity_per_unit: Option<String>,
    unit_price: Option<Decimal>,
    units_in_stock: i16,
    units_on_order: i16,
    reorder_level: i16,
    discontinued: bool,
}

impl Product {
    /// Creates a validated product, reporting every violated field at once.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        product_id: i32,
        product_name: impl Into<String>,
        supplier_id: Option<i32>,
        category_id: Option<i32>,
        quantity_per_unit: Option<String>,
        unit_price: Option<Decimal>,
        units_in_stock: i16,
        units_on_order: i16,
        reorder_level: i16,
        discontinued: bool,
    ) -> AppResult<Self> {
        let product_name = product_name.into();
        let mut violations = Violations::new();

        if product_name.trim().is_empty() {
            violations.push("productName", "is required");
        } else if product_name.len() > 40 {
            violations.push("productName", "must be at most 40 characters");
        }

        if let Some(price) = unit_price
            && price < Decimal::ZERO
        {
            violations.push("unitPrice", "must not be negative");
        }

        if units_in_stock < 0 {
            violations.push("unitsInStock", "must not be negative");
        }

        if units_on_order < 0 {
            violations.push("unitsOnOrder", "must not be negative");
        }

        if reorder_level < 0 {
            violations.push("reorderLevel", "must not be negative");
        }

        violations.into_result(Self {
            product_id,
            product_name,
            supplier_id,
            category_id,
            quantity_per_unit,
            unit_price,
            units_in_stock,
            units_on_order,
            reorder_level,
            discontinued,
        })
    }

    /// Returns the product identifier.
    #[must_use]
    pub fn product_id(&self) -> i32 {
        self.product_id
    }

    /// Returns the product name.
    #[must_use]
    pub fn product_name(&self) -> &str {
        self.product_name.as_str()
    }

    /// Returns the supplier reference, when any.
    #[must_use]
    pub fn supplier_id(&self) -> Option<i32> {
        self.supplier_id
    }

    /// Returns the category reference, when any.
    #[must_use]
    pub fn category_id(&self) -> Option<i32> {
        self.category_id
    }

    /// Returns the packaging description.
    #[must_use]
    pub fn quantity_per_unit(&self) -> Option<&str> {
        self.quantity_per_unit.as_deref()
    }

    /// Returns the unit price, when set.
    #[must_use]
    pub fn unit_price(&self) -> Option<Decimal> {
        self.unit_price
    }

    /// Returns the units on hand.
    #[must_use]
    pub fn units_in_stock(&self) -> i16 {
        self.units_in_stock
    }

    /// Returns the units currently on order.
    #[must_use]
    pub fn units_on_order(&self) -> i16 {
        self.units_on_order
    }

    /// Returns the reorder threshold.
    #[must_use]
    pub fn reorder_level(&self) -> i16 {
        self.reorder_level
    }

    /// Returns whether the product is discontinued.
    #[must_use]
    pub fn discontinued(&self) -> bool {
        self.discontinued
    }

    /// Classifies this product's stock through the canonical ladder.
    #[must_use]
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.discontinued, self.units_in_stock, self.reorder_level)
    }

    /// Scores catalog health from 100 down to a floor of 0.
    ///
    /// Discontinued products score 0 outright. Otherwise: -50 for a
    /// stock-out, -25 for stock under ten units, -20 for a missing or
    /// non-positive price, -15 without a category, -10 without a supplier.
    #[must_use]
    pub fn health_score(&self) -> u8 {
        if self.discontinued {
            return 0;
        }

        let mut score: i32 = 100;
        if self.units_in_stock == 0 {
            score -= 50;
        } else if self.units_in_stock < 10 {
            score -= 25;
        }

        if self.unit_price.is_none_or(|price| price <= Decimal::ZERO) {
            score -= 20;
        }

        if self.category_id.is_none() {
            score -= 15;
        }

        if self.supplier_id.is_none() {
            score -= 10;
        }

        score.max(0) as u8
    }
}
