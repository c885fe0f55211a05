use northwind_application::{CatalogService, DirectoryService, ReportService, SalesService};
use sqlx::PgPool;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Products, categories, and suppliers.
    pub catalog: CatalogService,
    /// Customers, orders, and shippers.
    pub sales: SalesService,
    /// Employees and the manager hierarchy.
    pub directory: DirectoryService,
    /// Aggregate reports.
    pub reports: ReportService,
    /// Pool handle used by the health check.
    pub pool: PgPool,
}
