//! Turns raw query-string parameters into a validated [`QuerySpec`].
//!
//! Unknown parameters are ignored for forward compatibility; everything
//! that is present must pass the entity schema's whitelist, and every
//! violation is reported in one response.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::NaiveDate;
use northwind_core::{AppResult, Violations};
use northwind_domain::{
    ColumnFilterKind, DEFAULT_PAGE_SIZE, EntitySchema, FilterDef, MAX_PAGE_SIZE, OrderStatus,
    SortDirection, years_before,
};
use rust_decimal::Decimal;

use super::{CompareOp, FilterCondition, FilterValue, QuerySpec};

#[derive(Debug, Default)]
struct RangeBounds {
    low: Option<FilterValue>,
    high: Option<FilterValue>,
}

/// Validates raw query parameters against an entity schema.
pub fn build_query_spec(
    schema: &EntitySchema,
    params: &BTreeMap<String, String>,
    today: NaiveDate,
) -> AppResult<QuerySpec> {
    let mut violations = Violations::new();

    let page = parse_page_number(params, "page", 1, &mut violations);
    let page_size = parse_page_size(params, &mut violations);

    let (default_column, default_direction) = schema.default_sort();
    let sort_column = match present(params, "sort") {
        Some(value) => match schema.sort_column_for(value) {
            Some(column) => column.to_owned(),
            None => {
                violations.push("sort", format!("unknown sort field '{value}'"));
                default_column.to_owned()
            }
        },
        None => default_column.to_owned(),
    };

    let sort_direction = match present(params, "order") {
        Some(value) => match SortDirection::parse_transport(value) {
            Ok(direction) => direction,
            Err(_) => {
                violations.push(
                    "order",
                    format!("unknown sort direction '{value}', expected ASC or DESC"),
                );
                default_direction
            }
        },
        None => default_direction,
    };

    let mut filters = Vec::new();
    let mut ranges: BTreeMap<&'static str, RangeBounds> = BTreeMap::new();

    for def in schema.filters() {
        match *def {
            FilterDef::Column {
                param,
                column,
                kind,
            } => {
                let Some(value) = present(params, param) else {
                    continue;
                };
                compile_column_filter(
                    param,
                    column,
                    kind,
                    value,
                    today,
                    &mut filters,
                    &mut ranges,
                    &mut violations,
                );
            }
            FilterDef::Search { param } => {
                // An explicitly supplied search must carry at least one
                // character; other filters treat empty as absent.
                let Some(raw) = params.get(param) else {
                    continue;
                };
                let term = raw.trim();
                if term.is_empty() {
                    violations.push(param, "must be at least 1 character");
                    continue;
                }

                filters.push(FilterCondition::Search {
                    columns: schema
                        .search_columns()
                        .iter()
                        .map(|column| (*column).to_owned())
                        .collect(),
                    term: term.to_owned(),
                });
            }
            FilterDef::OrderStatus { param } => {
                let Some(value) = present(params, param) else {
                    continue;
                };
                match OrderStatus::parse_transport(value) {
                    Ok(status) => filters.push(FilterCondition::Status(status)),
                    Err(_) => violations.push(
                        param,
                        format!(
                            "unknown status '{value}', expected pending, processing, shipped or overdue"
                        ),
                    ),
                }
            }
        }
    }

    // Paired min/max bounds collapse into one inclusive interval.
    for (column, bounds) in ranges {
        let condition = match (bounds.low, bounds.high) {
            (Some(low), Some(high)) => FilterCondition::Between {
                column: column.to_owned(),
                low,
                high,
            },
            (Some(low), None) => FilterCondition::Compare {
                column: column.to_owned(),
                op: CompareOp::Gte,
                value: low,
            },
            (None, Some(high)) => FilterCondition::Compare {
                column: column.to_owned(),
                op: CompareOp::Lte,
                value: high,
            },
            (None, None) => continue,
        };
        filters.push(condition);
    }

    let includes = collect_includes(schema, params, &mut violations);

    violations.into_query_result(QuerySpec::from_parts(
        page,
        page_size,
        sort_column,
        sort_direction,
        filters,
        includes,
        today,
    ))
}

/// Validates only the relation include flags, for single-record reads.
pub fn build_include_set(
    schema: &EntitySchema,
    params: &BTreeMap<String, String>,
) -> AppResult<BTreeSet<String>> {
    let mut violations = Violations::new();
    let includes = collect_includes(schema, params, &mut violations);
    violations.into_query_result(includes)
}

fn collect_includes(
    schema: &EntitySchema,
    params: &BTreeMap<String, String>,
    violations: &mut Violations,
) -> BTreeSet<String> {
    let mut includes = BTreeSet::new();

    for include in schema.includes() {
        let Some(value) = present(params, include.param) else {
            continue;
        };
        if value.eq_ignore_ascii_case("true") {
            includes.insert(include.relation.to_owned());
        } else if !value.eq_ignore_ascii_case("false") {
            violations.push(include.param, "must be true or false");
        }
    }

    includes
}

#[allow(clippy::too_many_arguments)]
fn compile_column_filter(
    param: &'static str,
    column: &'static str,
    kind: ColumnFilterKind,
    value: &str,
    today: NaiveDate,
    filters: &mut Vec<FilterCondition>,
    ranges: &mut BTreeMap<&'static str, RangeBounds>,
    violations: &mut Violations,
) {
    match kind {
        ColumnFilterKind::IntEquals => {
            if let Some(parsed) = parse_int(param, value, violations) {
                filters.push(FilterCondition::Compare {
                    column: column.to_owned(),
                    op: CompareOp::Eq,
                    value: FilterValue::Int(parsed),
                });
            }
        }
        ColumnFilterKind::TextEquals => {
            filters.push(FilterCondition::Compare {
                column: column.to_owned(),
                op: CompareOp::Eq,
                value: FilterValue::Text(value.to_owned()),
            });
        }
        ColumnFilterKind::BoolEquals => {
            if value.eq_ignore_ascii_case("true") {
                filters.push(FilterCondition::Compare {
                    column: column.to_owned(),
                    op: CompareOp::Eq,
                    value: FilterValue::Bool(true),
                });
            } else if value.eq_ignore_ascii_case("false") {
                filters.push(FilterCondition::Compare {
                    column: column.to_owned(),
                    op: CompareOp::Eq,
                    value: FilterValue::Bool(false),
                });
            } else {
                violations.push(param, "must be true or false");
            }
        }
        ColumnFilterKind::IntSet => {
            let mut values = Vec::new();
            let mut valid = true;
            for part in value.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                match part.parse::<i32>() {
                    Ok(parsed) => values.push(parsed),
                    Err(_) => {
                        violations.push(param, format!("'{part}' is not an integer"));
                        valid = false;
                    }
                }
            }
            if valid && !values.is_empty() {
                filters.push(FilterCondition::AnyOf {
                    column: column.to_owned(),
                    values,
                });
            }
        }
        ColumnFilterKind::DecimalLow => {
            if let Some(parsed) = parse_decimal(param, value, violations) {
                ranges.entry(column).or_default().low = Some(FilterValue::Number(parsed));
            }
        }
        ColumnFilterKind::DecimalHigh => {
            if let Some(parsed) = parse_decimal(param, value, violations) {
                ranges.entry(column).or_default().high = Some(FilterValue::Number(parsed));
            }
        }
        ColumnFilterKind::DateLow => {
            if let Some(parsed) = parse_date(param, value, violations) {
                ranges.entry(column).or_default().low = Some(FilterValue::Date(parsed));
            }
        }
        ColumnFilterKind::DateHigh => {
            if let Some(parsed) = parse_date(param, value, violations) {
                ranges.entry(column).or_default().high = Some(FilterValue::Date(parsed));
            }
        }
        ColumnFilterKind::AgeMin => {
            // Oldest birth date still satisfying the minimum age.
            if let Some(years) = parse_years(param, value, violations) {
                ranges.entry(column).or_default().high =
                    Some(FilterValue::Date(years_before(today, years)));
            }
        }
        ColumnFilterKind::AgeMax => {
            // A person turning exactly this age today stays included.
            if let Some(years) = parse_years(param, value, violations) {
                ranges.entry(column).or_default().low =
                    Some(FilterValue::Date(years_before(today, years)));
            }
        }
    }
}

/// Returns the trimmed parameter value, treating empty strings as absent.
fn present<'a>(params: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_page_number(
    params: &BTreeMap<String, String>,
    param: &'static str,
    default: u32,
    violations: &mut Violations,
) -> u32 {
    match present(params, param) {
        Some(value) => match value.parse::<u32>() {
            Ok(parsed) if parsed >= 1 => parsed,
            _ => {
                violations.push(param, "must be a positive integer");
                default
            }
        },
        None => default,
    }
}

fn parse_page_size(params: &BTreeMap<String, String>, violations: &mut Violations) -> u32 {
    match present(params, "limit") {
        Some(value) => match value.parse::<u32>() {
            Ok(parsed) if (1..=MAX_PAGE_SIZE).contains(&parsed) => parsed,
            _ => {
                violations.push(
                    "limit",
                    format!("must be an integer between 1 and {MAX_PAGE_SIZE}"),
                );
                DEFAULT_PAGE_SIZE
            }
        },
        None => DEFAULT_PAGE_SIZE,
    }
}

fn parse_int(param: &'static str, value: &str, violations: &mut Violations) -> Option<i32> {
    match value.parse::<i32>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            violations.push(param, "must be an integer");
            None
        }
    }
}

fn parse_decimal(param: &'static str, value: &str, violations: &mut Violations) -> Option<Decimal> {
    match Decimal::from_str(value) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            violations.push(param, "must be a decimal number");
            None
        }
    }
}

fn parse_date(param: &'static str, value: &str, violations: &mut Violations) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            violations.push(param, "must be a date in YYYY-MM-DD format");
            None
        }
    }
}

fn parse_years(param: &'static str, value: &str, violations: &mut Violations) -> Option<i32> {
    match value.parse::<i32>() {
        Ok(parsed) if (0..=150).contains(&parsed) => Some(parsed),
        _ => {
            violations.push(param, "must be a whole number of years between 0 and 150");
            None
        }
    }
}
