//! Compiles a validated [`QuerySpec`] into SQL.
//!
//! Column and table names come exclusively from the entity schema
//! whitelist; every user-supplied value is pushed as a bound parameter,
//! never interpolated into the query text.

use northwind_application::{CompareOp, FilterCondition, FilterValue, QuerySpec};
use northwind_domain::{EntitySchema, OrderStatus};
use sqlx::{Postgres, QueryBuilder};

#[cfg(test)]
mod tests;

/// Builds the page query: base select, compiled predicates, deterministic
/// ordering, limit and offset.
pub(crate) fn page_query<'q>(
    base_select: &str,
    schema: &EntitySchema,
    spec: &QuerySpec,
) -> QueryBuilder<'q, Postgres> {
    let mut builder = QueryBuilder::new(base_select);
    push_where(&mut builder, spec);

    builder.push(" ORDER BY ");
    builder.push(spec.sort_column());
    builder.push(' ');
    builder.push(spec.sort_direction().as_sql());
    // Primary key as tie-break keeps pagination stable across requests.
    builder.push(", ");
    builder.push(schema.id_column());
    builder.push(" ASC");

    builder.push(" LIMIT ");
    builder.push_bind(spec.limit());
    builder.push(" OFFSET ");
    builder.push_bind(spec.offset());

    builder
}

/// Builds the count query over the same predicates as the page query.
pub(crate) fn count_query<'q>(
    schema: &EntitySchema,
    spec: &QuerySpec,
) -> QueryBuilder<'q, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", schema.table()));
    push_where(&mut builder, spec);
    builder
}

fn push_where(builder: &mut QueryBuilder<'_, Postgres>, spec: &QuerySpec) {
    if spec.filters().is_empty() {
        return;
    }

    builder.push(" WHERE ");
    for (index, condition) in spec.filters().iter().enumerate() {
        if index > 0 {
            builder.push(" AND ");
        }
        push_condition(builder, condition, spec);
    }
}

fn push_condition(
    builder: &mut QueryBuilder<'_, Postgres>,
    condition: &FilterCondition,
    spec: &QuerySpec,
) {
    match condition {
        FilterCondition::Compare { column, op, value } => {
            builder.push(column.as_str());
            builder.push(match op {
                CompareOp::Eq => " = ",
                CompareOp::Gte => " >= ",
                CompareOp::Lte => " <= ",
            });
            push_value(builder, value);
        }
        FilterCondition::Between { column, low, high } => {
            builder.push(column.as_str());
            builder.push(" BETWEEN ");
            push_value(builder, low);
            builder.push(" AND ");
            push_value(builder, high);
        }
        FilterCondition::AnyOf { column, values } => {
            builder.push(column.as_str());
            builder.push(" = ANY(");
            builder.push_bind(values.clone());
            builder.push(')');
        }
        FilterCondition::Search { columns, term } => {
            let pattern = format!("%{}%", escape_like(term));
            builder.push('(');
            for (index, column) in columns.iter().enumerate() {
                if index > 0 {
                    builder.push(" OR ");
                }
                builder.push(column.as_str());
                builder.push(" ILIKE ");
                builder.push_bind(pattern.clone());
            }
            builder.push(')');
        }
        FilterCondition::Status(status) => match status {
            OrderStatus::Pending => {
                builder.push("(order_date IS NULL)");
            }
            OrderStatus::Processing => {
                builder.push("(order_date IS NOT NULL AND shipped_date IS NULL)");
            }
            OrderStatus::Shipped => {
                builder.push("(shipped_date IS NOT NULL)");
            }
            OrderStatus::Overdue => {
                builder.push("(shipped_date IS NULL AND required_date < ");
                builder.push_bind(spec.as_of());
                builder.push(')');
            }
        },
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Int(value) => {
            builder.push_bind(*value);
        }
        FilterValue::Number(value) => {
            builder.push_bind(*value);
        }
        FilterValue::Bool(value) => {
            builder.push_bind(*value);
        }
        FilterValue::Date(value) => {
            builder.push_bind(*value);
        }
        FilterValue::Text(value) => {
            builder.push_bind(value.clone());
        }
    }
}

/// Escapes LIKE metacharacters so a search term only ever matches as a
/// literal substring.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
