//! Domain entities, derived-field rules, and query whitelists.

#![forbid(unsafe_code)]

mod category;
mod customer;
mod employee;
mod order;
mod product;
mod schema;
mod shipper;
mod supplier;

pub use category::Category;
pub use customer::{Customer, CustomerTier};
pub use employee::{Employee, age_in_years, years_before, years_of_service};
pub use order::{Order, OrderDetail, OrderStatus, line_total, order_total};
pub use product::{Product, StockStatus};
pub use schema::{
    ColumnFilterKind, DEFAULT_PAGE_SIZE, EntitySchema, FilterDef, IncludeDef, MAX_PAGE_SIZE,
    SchemaRegistry, SortDirection,
};
pub use shipper::Shipper;
pub use supplier::Supplier;
