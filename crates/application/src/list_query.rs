//! Validated list-request model: the query spec, the filter conditions the
//! predicate layer compiles, and the pagination envelope.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use northwind_domain::{OrderStatus, SortDirection};
use rust_decimal::Decimal;

mod validator;

#[cfg(test)]
mod tests;

pub use validator::{build_include_set, build_query_spec};

/// Comparison operator for a single-column predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Column equals the value.
    Eq,
    /// Column is greater than or equal to the value.
    Gte,
    /// Column is less than or equal to the value.
    Lte,
}

/// A typed filter value; raw strings never survive validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// 32-bit integer, used for keys.
    Int(i32),
    /// Decimal number, used for money.
    Number(Decimal),
    /// Boolean flag.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Free text.
    Text(String),
}

/// One store-level condition derived from validated filters. Conditions
/// combine conjunctively; only the search group is disjunctive inside.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// `column <op> value`.
    Compare {
        /// Whitelisted column.
        column: String,
        /// Comparison operator.
        op: CompareOp,
        /// Bound value.
        value: FilterValue,
    },
    /// A merged `min`/`max` pair: one closed interval, both ends inclusive.
    Between {
        /// Whitelisted column.
        column: String,
        /// Inclusive lower bound.
        low: FilterValue,
        /// Inclusive upper bound.
        high: FilterValue,
    },
    /// `column` matches any of the listed integers.
    AnyOf {
        /// Whitelisted column.
        column: String,
        /// Allowed values.
        values: Vec<i32>,
    },
    /// Case-insensitive substring match over several columns, OR-combined
    /// inside the group and ANDed with every other condition.
    Search {
        /// Whitelisted columns the term is matched against.
        columns: Vec<String>,
        /// Search term; never interpolated, always bound.
        term: String,
    },
    /// Derived order-status predicate.
    Status(OrderStatus),
}

/// A normalized, validated description of one list request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    page: u32,
    page_size: u32,
    sort_column: String,
    sort_direction: SortDirection,
    filters: Vec<FilterCondition>,
    includes: BTreeSet<String>,
    as_of: NaiveDate,
}

impl QuerySpec {
    /// Creates a spec from already-validated parts.
    pub(crate) fn from_parts(
        page: u32,
        page_size: u32,
        sort_column: String,
        sort_direction: SortDirection,
        filters: Vec<FilterCondition>,
        includes: BTreeSet<String>,
        as_of: NaiveDate,
    ) -> Self {
        Self {
            page,
            page_size,
            sort_column,
            sort_direction,
            filters,
            includes,
            as_of,
        }
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the whitelisted sort column.
    #[must_use]
    pub fn sort_column(&self) -> &str {
        self.sort_column.as_str()
    }

    /// Returns the sort direction.
    #[must_use]
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Returns the compiled filter conditions.
    #[must_use]
    pub fn filters(&self) -> &[FilterCondition] {
        &self.filters
    }

    /// Returns whether a relation include was requested.
    #[must_use]
    pub fn includes(&self, relation: &str) -> bool {
        self.includes.contains(relation)
    }

    /// Returns the day the request is evaluated against, for derived
    /// predicates such as order status.
    #[must_use]
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Returns the store offset for the requested page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// Returns the store limit for the requested page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

/// One page of results plus the envelope numbers the API returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    total: i64,
    page: u32,
    page_size: u32,
}

impl<T> Page<T> {
    /// Wraps fetched rows with the spec that produced them.
    #[must_use]
    pub fn new(items: Vec<T>, total: i64, spec: &QuerySpec) -> Self {
        Self {
            items,
            total,
            page: spec.page(),
            page_size: spec.page_size(),
        }
    }

    /// Returns the page items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page into its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the total row count under the request's filters.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the page count: `ceil(total / page_size)`, zero when the
    /// result set is empty.
    #[must_use]
    pub fn pages(&self) -> u32 {
        if self.total <= 0 {
            return 0;
        }

        let total = self.total as u64;
        let size = u64::from(self.page_size.max(1));
        (total.div_ceil(size)).min(u64::from(u32::MAX)) as u32
    }
}
