//! Application services and ports.

#![forbid(unsafe_code)]

mod catalog_ports;
mod catalog_service;
mod directory_ports;
mod directory_service;
mod list_query;
mod report_ports;
mod report_service;
mod sales_ports;
mod sales_service;

pub use catalog_ports::{
    CategoryRepository, CreateCategory, CreateProduct, CreateSupplier, ProductRepository,
    SupplierRepository, UpdateCategory, UpdateProduct, UpdateSupplier,
};
pub use catalog_service::{CatalogService, CategoryView, ProductView, SupplierView};
pub use directory_ports::{CreateEmployee, EmployeeRepository, UpdateEmployee};
pub use directory_service::{DirectoryService, EmployeeNode, EmployeeView};
pub use list_query::{
    CompareOp, FilterCondition, FilterValue, Page, QuerySpec, build_include_set, build_query_spec,
};
pub use report_ports::{
    CategorySalesRow, ReportRepository, SupplierStatsRow, TopCustomerRow, YearlySalesRow,
};
pub use report_service::{ReportService, TopCustomer};
pub use sales_ports::{
    CreateCustomer, CreateOrder, CreateShipper, CustomerRepository, DetailLine, NewOrderDetail,
    OrderRepository, ShipperRepository, UpdateCustomer, UpdateOrder, UpdateShipper,
};
pub use sales_service::{CustomerView, DetailView, OrderView, SalesService, ShipperView};
