use std::collections::BTreeMap;

use chrono::NaiveDate;
use northwind_core::AppError;
use northwind_domain::{OrderStatus, SchemaRegistry, SortDirection, years_before};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{
    CompareOp, FilterCondition, FilterValue, Page, build_include_set, build_query_spec,
};

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap_or_else(|| unreachable!())
}

fn registry() -> SchemaRegistry {
    SchemaRegistry::northwind()
}

#[test]
fn absent_parameters_fall_back_to_defaults() {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let spec =
        build_query_spec(schema, &params(&[]), today()).unwrap_or_else(|_| unreachable!());

    assert_eq!(spec.page(), 1);
    assert_eq!(spec.page_size(), 10);
    assert_eq!(spec.sort_column(), "product_name");
    assert_eq!(spec.sort_direction(), SortDirection::Asc);
    assert!(spec.filters().is_empty());
}

#[test]
fn present_but_invalid_paging_is_rejected_not_defaulted() {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());

    for (key, value) in [("page", "0"), ("page", "abc"), ("limit", "0"), ("limit", "101")] {
        let result = build_query_spec(schema, &params(&[(key, value)]), today());
        assert!(result.is_err(), "{key}={value} should be rejected");
    }
}

#[test]
fn unknown_parameters_are_ignored() {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(
        schema,
        &params(&[("flavour", "spicy"), ("categoryId", "3")]),
        today(),
    )
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(spec.filters().len(), 1);
}

#[test]
fn every_violation_is_reported_at_once() {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let result = build_query_spec(
        schema,
        &params(&[
            ("page", "zero"),
            ("limit", "500"),
            ("sort", "injection; DROP TABLE products"),
            ("minPrice", "cheap"),
        ]),
        today(),
    );

    match result {
        Err(AppError::InvalidQuery(violations)) => assert_eq!(violations.len(), 4),
        _ => panic!("expected invalid query with all violations"),
    }
}

#[test]
fn sort_resolves_through_the_whitelist() {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(
        schema,
        &params(&[("sort", "unitPrice"), ("order", "desc")]),
        today(),
    )
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(spec.sort_column(), "unit_price");
    assert_eq!(spec.sort_direction(), SortDirection::Desc);
}

#[test]
fn empty_optional_filter_means_no_filter_but_empty_search_is_an_error() {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());

    let spec = build_query_spec(schema, &params(&[("categoryId", "")]), today())
        .unwrap_or_else(|_| unreachable!());
    assert!(spec.filters().is_empty());

    let result = build_query_spec(schema, &params(&[("search", "  ")]), today());
    assert!(result.is_err());
}

#[test]
fn min_and_max_price_merge_into_one_inclusive_interval() {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(
        schema,
        &params(&[("minPrice", "10"), ("maxPrice", "50")]),
        today(),
    )
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        spec.filters(),
        &[FilterCondition::Between {
            column: "unit_price".to_owned(),
            low: FilterValue::Number(dec!(10)),
            high: FilterValue::Number(dec!(50)),
        }]
    );
}

#[test]
fn age_bounds_become_birth_date_bounds_consistent_with_displayed_age() {
    let registry = registry();
    let schema = registry
        .schema("employees")
        .unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(
        schema,
        &params(&[("minAge", "30"), ("maxAge", "60")]),
        today(),
    )
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        spec.filters(),
        &[FilterCondition::Between {
            column: "birth_date".to_owned(),
            low: FilterValue::Date(years_before(today(), 60)),
            high: FilterValue::Date(years_before(today(), 30)),
        }]
    );
}

#[test]
fn status_filter_parses_the_derived_states() {
    let registry = registry();
    let schema = registry.schema("orders").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(schema, &params(&[("status", "overdue")]), today())
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        spec.filters(),
        &[FilterCondition::Status(OrderStatus::Overdue)]
    );

    let result = build_query_spec(schema, &params(&[("status", "lost")]), today());
    assert!(result.is_err());
}

#[test]
fn comma_separated_ids_become_a_set_filter() {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(schema, &params(&[("categoryIds", "1, 2,3")]), today())
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(
        spec.filters(),
        &[FilterCondition::AnyOf {
            column: "category_id".to_owned(),
            values: vec![1, 2, 3],
        }]
    );

    let result = build_query_spec(schema, &params(&[("categoryIds", "1,x")]), today());
    assert!(result.is_err());
}

#[test]
fn include_flags_validate_against_the_whitelist() {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());

    let includes = build_include_set(schema, &params(&[("includeCategory", "true")]))
        .unwrap_or_else(|_| unreachable!());
    assert!(includes.contains("category"));

    // Unknown include flags are just unknown parameters.
    let includes = build_include_set(schema, &params(&[("includeInvoice", "true")]))
        .unwrap_or_else(|_| unreachable!());
    assert!(includes.is_empty());

    let result = build_include_set(schema, &params(&[("includeCategory", "yes")]));
    assert!(result.is_err());
}

// Minimal in-memory row evaluator mirroring the predicate semantics, used
// to pin down filter composition on a fixed fixture set.
#[derive(Debug, Clone, PartialEq)]
struct FixtureRow {
    product_id: i32,
    name: &'static str,
    category_id: Option<i32>,
    unit_price: Option<Decimal>,
    discontinued: bool,
}

fn fixture() -> Vec<FixtureRow> {
    vec![
        FixtureRow {
            product_id: 1,
            name: "Chai",
            category_id: Some(1),
            unit_price: Some(dec!(18.00)),
            discontinued: false,
        },
        FixtureRow {
            product_id: 2,
            name: "Chang",
            category_id: Some(1),
            unit_price: Some(dec!(19.00)),
            discontinued: false,
        },
        FixtureRow {
            product_id: 3,
            name: "Aniseed Syrup",
            category_id: Some(2),
            unit_price: Some(dec!(10.00)),
            discontinued: false,
        },
        FixtureRow {
            product_id: 4,
            name: "Mishi Kobe Niku",
            category_id: Some(6),
            unit_price: Some(dec!(97.00)),
            discontinued: true,
        },
        FixtureRow {
            product_id: 5,
            name: "Chef Anton's Gumbo Mix",
            category_id: Some(2),
            unit_price: None,
            discontinued: true,
        },
    ]
}

fn row_matches(row: &FixtureRow, condition: &FilterCondition) -> bool {
    fn column_value(row: &FixtureRow, column: &str) -> Option<FilterValue> {
        match column {
            "category_id" => row.category_id.map(FilterValue::Int),
            "unit_price" => row.unit_price.map(FilterValue::Number),
            "discontinued" => Some(FilterValue::Bool(row.discontinued)),
            "product_name" => Some(FilterValue::Text(row.name.to_owned())),
            _ => None,
        }
    }

    fn compare(left: &FilterValue, op: CompareOp, right: &FilterValue) -> bool {
        match (left, right) {
            (FilterValue::Int(a), FilterValue::Int(b)) => match op {
                CompareOp::Eq => a == b,
                CompareOp::Gte => a >= b,
                CompareOp::Lte => a <= b,
            },
            (FilterValue::Number(a), FilterValue::Number(b)) => match op {
                CompareOp::Eq => a == b,
                CompareOp::Gte => a >= b,
                CompareOp::Lte => a <= b,
            },
            (FilterValue::Bool(a), FilterValue::Bool(b)) => match op {
                CompareOp::Eq => a == b,
                _ => false,
            },
            (FilterValue::Text(a), FilterValue::Text(b)) => match op {
                CompareOp::Eq => a == b,
                _ => false,
            },
            _ => false,
        }
    }

    match condition {
        FilterCondition::Compare { column, op, value } => column_value(row, column)
            .is_some_and(|actual| compare(&actual, *op, value)),
        FilterCondition::Between { column, low, high } => {
            column_value(row, column).is_some_and(|actual| {
                compare(&actual, CompareOp::Gte, low) && compare(&actual, CompareOp::Lte, high)
            })
        }
        FilterCondition::AnyOf { column, values } => column_value(row, column)
            .is_some_and(|actual| {
                values
                    .iter()
                    .any(|value| compare(&actual, CompareOp::Eq, &FilterValue::Int(*value)))
            }),
        FilterCondition::Search { columns, term } => columns.iter().any(|column| {
            matches!(
                column_value(row, column),
                Some(FilterValue::Text(text)) if text.to_lowercase().contains(&term.to_lowercase())
            )
        }),
        FilterCondition::Status(_) => false,
    }
}

fn apply(spec_params: &[(&str, &str)]) -> Vec<i32> {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(schema, &params(spec_params), today())
        .unwrap_or_else(|_| unreachable!());

    fixture()
        .iter()
        .filter(|row| spec.filters().iter().all(|condition| row_matches(row, condition)))
        .map(|row| row.product_id)
        .collect()
}

#[test]
fn combined_filters_are_the_intersection_of_single_filters() {
    let by_category = apply(&[("categoryId", "1")]);
    let by_price = apply(&[("minPrice", "10"), ("maxPrice", "50")]);
    let combined = apply(&[("categoryId", "1"), ("minPrice", "10"), ("maxPrice", "50")]);

    let intersection: Vec<i32> = by_category
        .iter()
        .copied()
        .filter(|id| by_price.contains(id))
        .collect();

    assert_eq!(combined, intersection);
    assert_eq!(combined, vec![1, 2]);
}

#[test]
fn search_group_is_anded_with_other_filters() {
    let hits = apply(&[("search", "ch"), ("categoryId", "2")]);
    assert_eq!(hits, vec![5]);
}

#[test]
fn page_count_has_a_zero_floor_and_a_ceiling_rule() {
    let registry = registry();
    let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
    let spec = build_query_spec(schema, &params(&[("limit", "10")]), today())
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(Page::<i32>::new(Vec::new(), 0, &spec).pages(), 0);
    assert_eq!(Page::<i32>::new(Vec::new(), 1, &spec).pages(), 1);
    assert_eq!(Page::<i32>::new(Vec::new(), 10, &spec).pages(), 1);
    assert_eq!(Page::<i32>::new(Vec::new(), 11, &spec).pages(), 2);
    assert_eq!(Page::<i32>::new(Vec::new(), 101, &spec).pages(), 11);
}

proptest! {
    #[test]
    fn pages_is_always_the_ceiling_of_total_over_limit(
        total in 0i64..=100_000,
        limit in 1u32..=100,
    ) {
        let registry = registry();
        let schema = registry.schema("products").unwrap_or_else(|_| unreachable!());
        let limit_value = limit.to_string();
        let spec = build_query_spec(
            schema,
            &params(&[("limit", limit_value.as_str())]),
            today(),
        )
        .unwrap_or_else(|_| unreachable!());
        let page = Page::<i32>::new(Vec::new(), total, &spec);

        let expected = (total as u64).div_ceil(u64::from(limit)) as u32;
        prop_assert_eq!(page.pages(), expected);
        prop_assert_eq!(page.pages() == 0, total == 0);
    }
}
