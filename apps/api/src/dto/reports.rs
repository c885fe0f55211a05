use northwind_application::{CategorySalesRow, SupplierStatsRow, TopCustomer, YearlySalesRow};
use rust_decimal::Decimal;
use serde::Serialize;

/// One ranked customer with the derived spend tier.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomerResponse {
    pub customer_id: i32,
    pub company_name: String,
    pub order_count: i64,
    pub total_spend: Decimal,
    pub tier: &'static str,
}

impl From<TopCustomer> for TopCustomerResponse {
    fn from(row: TopCustomer) -> Self {
        Self {
            customer_id: row.customer_id,
            company_name: row.company_name,
            order_count: row.order_count,
            total_spend: row.total_spend,
            tier: row.tier.as_str(),
        }
    }
}

/// Revenue for one product category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySalesResponse {
    pub category_id: i32,
    pub category_name: String,
    pub units_sold: i64,
    pub revenue: Decimal,
}

impl From<CategorySalesRow> for CategorySalesResponse {
    fn from(row: CategorySalesRow) -> Self {
        Self {
            category_id: row.category_id,
            category_name: row.category_name,
            units_sold: row.units_sold,
            revenue: row.revenue,
        }
    }
}

/// Revenue for one order year.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySalesResponse {
    pub year: i32,
    pub order_count: i64,
    pub revenue: Decimal,
}

impl From<YearlySalesRow> for YearlySalesResponse {
    fn from(row: YearlySalesRow) -> Self {
        Self {
            year: row.year,
            order_count: row.order_count,
            revenue: row.revenue,
        }
    }
}

/// Catalog statistics for one supplier.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierStatsResponse {
    pub supplier_id: i32,
    pub company_name: String,
    pub product_count: i64,
    pub units_in_stock: i64,
    pub average_unit_price: Option<Decimal>,
}

impl From<SupplierStatsRow> for SupplierStatsResponse {
    fn from(row: SupplierStatsRow) -> Self {
        Self {
            supplier_id: row.supplier_id,
            company_name: row.company_name,
            product_count: row.product_count,
            units_in_stock: row.units_in_stock,
            average_unit_price: row.average_unit_price,
        }
    }
}
