//! Aggregate reporting service.

use std::collections::BTreeMap;
use std::sync::Arc;

use northwind_core::{AppResult, Violations};
use northwind_domain::CustomerTier;
use rust_decimal::Decimal;

use crate::report_ports::{
    CategorySalesRow, ReportRepository, SupplierStatsRow, TopCustomerRow, YearlySalesRow,
};


const DEFAULT_RANKING_LIMIT: i64 = 10;
const MAX_RANKING_LIMIT: i64 = 100;

/// A ranked customer with the derived spend tier attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TopCustomer {
    /// Customer identifier.
    pub customer_id: i32,
    /// Company name.
    pub company_name: String,
    /// Number of orders placed.
    pub order_count: i64,
    /// Discounted lifetime spend.
    pub total_spend: Decimal,
    /// Derived spend tier.
    pub tier: CustomerTier,
}

/// Orchestrates aggregate reports over the reporting port.
#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
}

impl ReportService {
    /// Creates the service over its port.
    pub fn new(reports: Arc<dyn ReportRepository>) -> Self {
        Self { reports }
    }

    /// Ranks customers by spend and attaches their tier.
    pub async fn top_customers(
        &self,
        params: &BTreeMap<String, String>,
    ) -> AppResult<Vec<TopCustomer>> {
        let mut violations = Violations::new();
        let limit = match params.get("limit").map(String::as_str).filter(|value| {
            !value.trim().is_empty()
        }) {
            Some(value) => match value.trim().parse::<i64>() {
                Ok(parsed) if (1..=MAX_RANKING_LIMIT).contains(&parsed) => parsed,
                _ => {
                    violations.push(
                        "limit",
                        format!("must be an integer between 1 and {MAX_RANKING_LIMIT}"),
                    );
                    DEFAULT_RANKING_LIMIT
                }
            },
            None => DEFAULT_RANKING_LIMIT,
        };
        let limit = violations.into_query_result(limit)?;

        let rows = self.reports.top_customers(limit).await?;
        Ok(rows
            .into_iter()
            .map(|row: TopCustomerRow| TopCustomer {
                tier: CustomerTier::classify(row.total_spend),
                customer_id: row.customer_id,
                company_name: row.company_name,
                order_count: row.order_count,
                total_spend: row.total_spend,
            })
            .collect())
    }

    /// Sums revenue per category, optionally for one order year.
    pub async fn sales_by_category(
        &self,
        params: &BTreeMap<String, String>,
    ) -> AppResult<Vec<CategorySalesRow>> {
        let mut violations = Violations::new();
        let year = match params.get("year").map(String::as_str).filter(|value| {
            !value.trim().is_empty()
        }) {
            Some(value) => match value.trim().parse::<i32>() {
                Ok(parsed) if (1900..=9999).contains(&parsed) => Some(parsed),
                _ => {
                    violations.push("year", "must be a four-digit year");
                    None
                }
            },
            None => None,
        };
        let year = violations.into_query_result(year)?;

        self.reports.sales_by_category(year).await
    }

    /// Sums revenue and order counts per order year.
    pub async fn sales_by_year(&self) -> AppResult<Vec<YearlySalesRow>> {
        self.reports.sales_by_year().await
    }

    /// Computes per-supplier catalog statistics.
    pub async fn supplier_stats(&self) -> AppResult<Vec<SupplierStatsRow>> {
        self.reports.supplier_stats().await
    }
}
