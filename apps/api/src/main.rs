//! Northwind API composition root.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use northwind_application::{CatalogService, DirectoryService, ReportService, SalesService};
use northwind_core::AppError;
use northwind_domain::SchemaRegistry;
use northwind_infrastructure::{
    PostgresCatalogRepository, PostgresDirectoryRepository, PostgresReportRepository,
    PostgresSalesRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

    let database_url = required_env("DATABASE_URL")?;
    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3000);
    let cors_allow_origin = env::var("CORS_ALLOW_ORIGIN").ok();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|error| AppError::StoreUnavailable(format!(
            "failed to connect to database: {error}"
        )))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    // The schema registry is built once here and passed by reference into
    // every repository and service.
    let registry = Arc::new(SchemaRegistry::northwind());

    let catalog_repository = Arc::new(PostgresCatalogRepository::new(
        pool.clone(),
        registry.clone(),
    ));
    let sales_repository = Arc::new(PostgresSalesRepository::new(pool.clone(), registry.clone()));
    let directory_repository = Arc::new(PostgresDirectoryRepository::new(
        pool.clone(),
        registry.clone(),
    ));
    let report_repository = Arc::new(PostgresReportRepository::new(pool.clone()));

    let app_state = AppState {
        catalog: CatalogService::new(
            registry.clone(),
            catalog_repository.clone(),
            catalog_repository.clone(),
            catalog_repository,
        ),
        sales: SalesService::new(
            registry.clone(),
            sales_repository.clone(),
            sales_repository.clone(),
            sales_repository,
            directory_repository.clone(),
        ),
        directory: DirectoryService::new(registry.clone(), directory_repository),
        reports: ReportService::new(report_repository),
        pool: pool.clone(),
    };

    let api_routes = Router::new()
        .route(
            "/api/products",
            get(handlers::products::list_products_handler)
                .post(handlers::products::create_product_handler),
        )
        .route(
            "/api/products/{product_id}",
            get(handlers::products::get_product_handler)
                .put(handlers::products::update_product_handler)
                .delete(handlers::products::delete_product_handler),
        )
        .route(
            "/api/categories",
            get(handlers::categories::list_categories_handler)
                .post(handlers::categories::create_category_handler),
        )
        .route(
            "/api/categories/{category_id}",
            get(handlers::categories::get_category_handler)
                .put(handlers::categories::update_category_handler)
                .delete(handlers::categories::delete_category_handler),
        )
        .route(
            "/api/suppliers",
            get(handlers::suppliers::list_suppliers_handler)
                .post(handlers::suppliers::create_supplier_handler),
        )
        .route(
            "/api/suppliers/{supplier_id}",
            get(handlers::suppliers::get_supplier_handler)
                .put(handlers::suppliers::update_supplier_handler)
                .delete(handlers::suppliers::delete_supplier_handler),
        )
        .route(
            "/api/customers",
            get(handlers::customers::list_customers_handler)
                .post(handlers::customers::create_customer_handler),
        )
        .route(
            "/api/customers/{customer_id}",
            get(handlers::customers::get_customer_handler)
                .put(handlers::customers::update_customer_handler)
                .delete(handlers::customers::delete_customer_handler),
        )
        .route(
            "/api/employees",
            get(handlers::employees::list_employees_handler)
                .post(handlers::employees::create_employee_handler),
        )
        .route(
            "/api/employees/hierarchy",
            get(handlers::employees::employee_hierarchy_handler),
        )
        .route(
            "/api/employees/{employee_id}",
            get(handlers::employees::get_employee_handler)
                .put(handlers::employees::update_employee_handler)
                .delete(handlers::employees::delete_employee_handler),
        )
        .route(
            "/api/orders",
            get(handlers::orders::list_orders_handler)
                .post(handlers::orders::create_order_handler),
        )
        .route(
            "/api/orders/{order_id}",
            get(handlers::orders::get_order_handler)
                .put(handlers::orders::update_order_handler)
                .delete(handlers::orders::delete_order_handler),
        )
        .route(
            "/api/shippers",
            get(handlers::shippers::list_shippers_handler)
                .post(handlers::shippers::create_shipper_handler),
        )
        .route(
            "/api/shippers/{shipper_id}",
            get(handlers::shippers::get_shipper_handler)
                .put(handlers::shippers::update_shipper_handler)
                .delete(handlers::shippers::delete_shipper_handler),
        )
        .route(
            "/api/reports/top-customers",
            get(handlers::reports::top_customers_handler),
        )
        .route(
            "/api/reports/sales-by-category",
            get(handlers::reports::sales_by_category_handler),
        )
        .route(
            "/api/reports/sales-by-year",
            get(handlers::reports::sales_by_year_handler),
        )
        .route(
            "/api/reports/supplier-stats",
            get(handlers::reports::supplier_stats_handler),
        );

    let cors_layer = match cors_allow_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(HeaderValue::from_str(&origin).map_err(|error| {
                AppError::Internal(format!("invalid CORS_ALLOW_ORIGIN: {error}"))
            })?)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([CONTENT_TYPE]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "northwind-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(vec![northwind_core::FieldViolation::new(
        name,
        "environment variable is required",
    )]))
}
