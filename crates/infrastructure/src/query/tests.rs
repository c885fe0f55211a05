use std::collections::BTreeMap;

use chrono::NaiveDate;
use northwind_application::build_query_spec;
use northwind_domain::SchemaRegistry;

use super::{count_query, escape_like, page_query};

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap_or_else(|| unreachable!())
}

#[test]
fn page_query_orders_deterministically_and_binds_paging() {
    let registry = SchemaRegistry::northwind();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(
        schema,
        &params(&[("sort", "unitPrice"), ("order", "DESC")]),
        today(),
    )
    .unwrap_or_else(|_| unreachable!());

    let mut builder = page_query("SELECT * FROM products", schema, &spec);
    let sql = builder.sql();

    assert!(sql.contains("ORDER BY unit_price DESC, product_id ASC"));
    assert!(sql.contains("LIMIT $1 OFFSET $2"));
}

#[test]
fn user_values_only_ever_appear_as_bound_parameters() {
    let registry = SchemaRegistry::northwind();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(
        schema,
        &params(&[
            ("minPrice", "77"),
            ("maxPrice", "88"),
            ("search", "drop table products"),
        ]),
        today(),
    )
    .unwrap_or_else(|_| unreachable!());

    let mut builder = page_query("SELECT * FROM products", schema, &spec);
    let sql = builder.sql();

    assert!(!sql.contains("77"));
    assert!(!sql.contains("88"));
    assert!(!sql.contains("drop table"));
    assert!(sql.contains("unit_price BETWEEN $"));
    assert!(sql.contains("product_name ILIKE $"));
}

#[test]
fn paired_bounds_compile_to_one_inclusive_interval() {
    let registry = SchemaRegistry::northwind();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(
        schema,
        &params(&[("minPrice", "10"), ("maxPrice", "50")]),
        today(),
    )
    .unwrap_or_else(|_| unreachable!());

    let mut builder = count_query(schema, &spec);
    assert!(
        builder
            .sql()
            .contains("WHERE unit_price BETWEEN $1 AND $2")
    );
}

#[test]
fn search_is_a_disjunctive_group_anded_with_other_filters() {
    let registry = SchemaRegistry::northwind();
    let schema = registry
        .schema("customers")
        .unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(
        schema,
        &params(&[("country", "Germany"), ("search", "alfred")]),
        today(),
    )
    .unwrap_or_else(|_| unreachable!());

    let mut builder = count_query(schema, &spec);
    let sql = builder.sql();

    assert!(sql.contains("(company_name ILIKE $"));
    assert!(sql.contains(" OR contact_name ILIKE $"));
    assert!(sql.contains(" AND "));
}

#[test]
fn status_predicates_are_derived_not_stored() {
    let registry = SchemaRegistry::northwind();
    let schema = registry.schema("orders").unwrap_or_else(|_| unreachable!());

    let spec = build_query_spec(schema, &params(&[("status", "pending")]), today())
        .unwrap_or_else(|_| unreachable!());
    assert!(count_query(schema, &spec).sql().contains("(order_date IS NULL)"));

    let spec = build_query_spec(schema, &params(&[("status", "processing")]), today())
        .unwrap_or_else(|_| unreachable!());
    assert!(
        count_query(schema, &spec)
            .sql()
            .contains("(order_date IS NOT NULL AND shipped_date IS NULL)")
    );

    let spec = build_query_spec(schema, &params(&[("status", "overdue")]), today())
        .unwrap_or_else(|_| unreachable!());
    assert!(
        count_query(schema, &spec)
            .sql()
            .contains("(shipped_date IS NULL AND required_date < $1)")
    );
}

#[test]
fn count_and_page_share_the_same_predicates() {
    let registry = SchemaRegistry::northwind();
    let schema = registry.schema("orders").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(
        schema,
        &params(&[("customerId", "9"), ("status", "shipped")]),
        today(),
    )
    .unwrap_or_else(|_| unreachable!());

    let count_sql = count_query(schema, &spec).sql().to_owned();
    let page_sql = page_query("SELECT * FROM orders", schema, &spec)
        .sql()
        .to_owned();

    let clause = "customer_id = $1 AND (shipped_date IS NOT NULL)";
    assert!(count_sql.contains(clause));
    assert!(page_sql.contains(clause));
}

#[test]
fn like_metacharacters_match_literally() {
    assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
}
