use std::collections::BTreeMap;

use northwind_core::{AppError, AppResult};

/// Page size applied when the request does not name one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on the requested page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort direction for a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Parses the transport value, case-insensitively.
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::invalid_field(
                "order",
                format!("unknown sort direction '{value}', expected ASC or DESC"),
            )),
        }
    }

    /// Returns the SQL keyword for the direction.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// How one whitelisted query parameter maps onto a stored column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFilterKind {
    /// Integer equality.
    IntEquals,
    /// Text equality.
    TextEquals,
    /// Boolean equality.
    BoolEquals,
    /// Membership in a comma-separated integer set.
    IntSet,
    /// Inclusive lower bound on a decimal column.
    DecimalLow,
    /// Inclusive upper bound on a decimal column.
    DecimalHigh,
    /// Inclusive lower bound on a date column.
    DateLow,
    /// Inclusive upper bound on a date column.
    DateHigh,
    /// Minimum age in years against a stored birth-date column.
    AgeMin,
    /// Maximum age in years against a stored birth-date column.
    AgeMax,
}

/// One entry in an entity's filter whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDef {
    /// A parameter bound to a single stored column.
    Column {
        /// Query-string parameter name.
        param: &'static str,
        /// Whitelisted column the predicate targets.
        column: &'static str,
        /// Parse and predicate rule for the parameter.
        kind: ColumnFilterKind,
    },
    /// Disjunctive substring search over the schema's search columns.
    Search {
        /// Query-string parameter name.
        param: &'static str,
    },
    /// Derived order-status predicate (no stored column).
    OrderStatus {
        /// Query-string parameter name.
        param: &'static str,
    },
}

impl FilterDef {
    /// Returns the query-string parameter this definition accepts.
    #[must_use]
    pub fn param(&self) -> &'static str {
        match self {
            Self::Column { param, .. } | Self::Search { param } | Self::OrderStatus { param } => {
                param
            }
        }
    }
}

/// A relation that may be attached to list/get responses on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeDef {
    /// Query-string flag, e.g. `includeCategory`.
    pub param: &'static str,
    /// Stable relation name used by the application layer.
    pub relation: &'static str,
}

/// Per-entity whitelist for list requests: sortable fields, filterable
/// parameters, relation includes, and the default ordering. Nothing outside
/// this schema ever reaches the store as part of a query.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    entity: &'static str,
    table: &'static str,
    id_column: &'static str,
    default_sort_column: &'static str,
    default_sort_direction: SortDirection,
    sortable: &'static [(&'static str, &'static str)],
    filters: &'static [FilterDef],
    search_columns: &'static [&'static str],
    includes: &'static [IncludeDef],
}

impl EntitySchema {
    #[allow(clippy::too_many_arguments)]
    const fn new(
        entity: &'static str,
        table: &'static str,
        id_column: &'static str,
        default_sort_column: &'static str,
        default_sort_direction: SortDirection,
        sortable: &'static [(&'static str, &'static str)],
        filters: &'static [FilterDef],
        search_columns: &'static [&'static str],
        includes: &'static [IncludeDef],
    ) -> Self {
        Self {
            entity,
            table,
            id_column,
            default_sort_column,
            default_sort_direction,
            sortable,
            filters,
            search_columns,
            includes,
        }
    }

    /// Returns the entity name the schema describes.
    #[must_use]
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Returns the backing table name.
    #[must_use]
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Returns the primary-key column, used as the deterministic tie-break.
    #[must_use]
    pub fn id_column(&self) -> &'static str {
        self.id_column
    }

    /// Returns the default sort column and direction.
    #[must_use]
    pub fn default_sort(&self) -> (&'static str, SortDirection) {
        (self.default_sort_column, self.default_sort_direction)
    }

    /// Resolves a transport sort field through the whitelist.
    #[must_use]
    pub fn sort_column_for(&self, param: &str) -> Option<&'static str> {
        self.sortable
            .iter()
            .find(|(name, _)| *name == param)
            .map(|(_, column)| *column)
    }

    /// Returns the filter whitelist.
    #[must_use]
    pub fn filters(&self) -> &'static [FilterDef] {
        self.filters
    }

    /// Returns the columns a `search` parameter matches against.
    #[must_use]
    pub fn search_columns(&self) -> &'static [&'static str] {
        self.search_columns
    }

    /// Resolves an include flag through the whitelist.
    #[must_use]
    pub fn include_relation_for(&self, param: &str) -> Option<&'static str> {
        self.includes
            .iter()
            .find(|include| include.param == param)
            .map(|include| include.relation)
    }

    /// Returns the declared relation includes.
    #[must_use]
    pub fn includes(&self) -> &'static [IncludeDef] {
        self.includes
    }
}

const PRODUCTS: EntitySchema = EntitySchema::new(
    "products",
    "products",
    "product_id",
    "product_name",
    SortDirection::Asc,
    &[
        ("productId", "product_id"),
        ("productName", "product_name"),
        ("unitPrice", "unit_price"),
        ("unitsInStock", "units_in_stock"),
    ],
    &[
        FilterDef::Column {
            param: "categoryId",
            column: "category_id",
            kind: ColumnFilterKind::IntEquals,
        },
        FilterDef::Column {
            param: "categoryIds",
            column: "category_id",
            kind: ColumnFilterKind::IntSet,
        },
        FilterDef::Column {
            param: "supplierId",
            column: "supplier_id",
            kind: ColumnFilterKind::IntEquals,
        },
        FilterDef::Column {
            param: "discontinued",
            column: "discontinued",
            kind: ColumnFilterKind::BoolEquals,
        },
        FilterDef::Column {
            param: "minPrice",
            column: "unit_price",
            kind: ColumnFilterKind::DecimalLow,
        },
        FilterDef::Column {
            param: "maxPrice",
            column: "unit_price",
            kind: ColumnFilterKind::DecimalHigh,
        },
        FilterDef::Search { param: "search" },
    ],
    &["product_name"],
    &[
        IncludeDef {
            param: "includeCategory",
            relation: "category",
        },
        IncludeDef {
            param: "includeSupplier",
            relation: "supplier",
        },
    ],
);

const CATEGORIES: EntitySchema = EntitySchema::new(
    "categories",
    "categories",
    "category_id",
    "category_name",
    SortDirection::Asc,
    &[
        ("categoryId", "category_id"),
        ("categoryName", "category_name"),
    ],
    &[FilterDef::Search { param: "search" }],
    &["category_name"],
    &[],
);

const SUPPLIERS: EntitySchema = EntitySchema::new(
    "suppliers",
    "suppliers",
    "supplier_id",
    "company_name",
    SortDirection::Asc,
    &[
        ("supplierId", "supplier_id"),
        ("companyName", "company_name"),
        ("country", "country"),
    ],
    &[
        FilterDef::Column {
            param: "country",
            column: "country",
            kind: ColumnFilterKind::TextEquals,
        },
        FilterDef::Column {
            param: "city",
            column: "city",
            kind: ColumnFilterKind::TextEquals,
        },
        FilterDef::Search { param: "search" },
    ],
    &["company_name", "contact_name"],
    &[],
);

const CUSTOMERS: EntitySchema = EntitySchema::new(
    "customers",
    "customers",
    "customer_id",
    "company_name",
    SortDirection::Asc,
    &[
        ("customerId", "customer_id"),
        ("companyName", "company_name"),
        ("country", "country"),
        ("city", "city"),
    ],
    &[
        FilterDef::Column {
            param: "country",
            column: "country",
            kind: ColumnFilterKind::TextEquals,
        },
        FilterDef::Column {
            param: "city",
            column: "city",
            kind: ColumnFilterKind::TextEquals,
        },
        FilterDef::Search { param: "search" },
    ],
    &["company_name", "contact_name"],
    &[],
);

const EMPLOYEES: EntitySchema = EntitySchema::new(
    "employees",
    "employees",
    "employee_id",
    "last_name",
    SortDirection::Asc,
    &[
        ("employeeId", "employee_id"),
        ("lastName", "last_name"),
        ("firstName", "first_name"),
        ("hireDate", "hire_date"),
    ],
    &[
        FilterDef::Column {
            param: "country",
            column: "country",
            kind: ColumnFilterKind::TextEquals,
        },
        FilterDef::Column {
            param: "city",
            column: "city",
            kind: ColumnFilterKind::TextEquals,
        },
        FilterDef::Column {
            param: "title",
            column: "title",
            kind: ColumnFilterKind::TextEquals,
        },
        FilterDef::Column {
            param: "minAge",
            column: "birth_date",
            kind: ColumnFilterKind::AgeMin,
        },
        FilterDef::Column {
            param: "maxAge",
            column: "birth_date",
            kind: ColumnFilterKind::AgeMax,
        },
        FilterDef::Search { param: "search" },
    ],
    &["first_name", "last_name"],
    &[IncludeDef {
        param: "includeManager",
        relation: "manager",
    }],
);

const ORDERS: EntitySchema = EntitySchema::new(
    "orders",
    "orders",
    "order_id",
    "order_date",
    SortDirection::Desc,
    &[
        ("orderId", "order_id"),
        ("orderDate", "order_date"),
        ("requiredDate", "required_date"),
        ("shippedDate", "shipped_date"),
        ("freight", "freight"),
    ],
    &[
        FilterDef::Column {
            param: "customerId",
            column: "customer_id",
            kind: ColumnFilterKind::IntEquals,
        },
        FilterDef::Column {
            param: "employeeId",
            column: "employee_id",
            kind: ColumnFilterKind::IntEquals,
        },
        FilterDef::Column {
            param: "minDate",
            column: "order_date",
            kind: ColumnFilterKind::DateLow,
        },
        FilterDef::Column {
            param: "maxDate",
            column: "order_date",
            kind: ColumnFilterKind::DateHigh,
        },
        FilterDef::OrderStatus { param: "status" },
    ],
    &[],
    &[
        IncludeDef {
            param: "includeCustomer",
            relation: "customer",
        },
        IncludeDef {
            param: "includeEmployee",
            relation: "employee",
        },
        IncludeDef {
            param: "includeShipper",
            relation: "shipper",
        },
        IncludeDef {
            param: "includeDetails",
            relation: "details",
        },
    ],
);

const SHIPPERS: EntitySchema = EntitySchema::new(
    "shippers",
    "shippers",
    "shipper_id",
    "company_name",
    SortDirection::Asc,
    &[
        ("shipperId", "shipper_id"),
        ("companyName", "company_name"),
    ],
    &[],
    &[],
    &[],
);

/// Registry of every entity schema, built once at process start and passed
/// by reference into the query layer.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<&'static str, EntitySchema>,
}

impl SchemaRegistry {
    /// Builds the registry for the Northwind schema.
    #[must_use]
    pub fn northwind() -> Self {
        let mut schemas = BTreeMap::new();
        for schema in [
            PRODUCTS, CATEGORIES, SUPPLIERS, CUSTOMERS, EMPLOYEES, ORDERS, SHIPPERS,
        ] {
            schemas.insert(schema.entity(), schema);
        }

        Self { schemas }
    }

    /// Looks up the schema for an entity.
    pub fn schema(&self, entity: &str) -> AppResult<&EntitySchema> {
        self.schemas
            .get(entity)
            .ok_or_else(|| AppError::Internal(format!("no schema registered for entity '{entity}'")))
    }
}
