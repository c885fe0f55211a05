//! HTTP handlers, one module per resource.

use std::collections::BTreeMap;

pub mod categories;
pub mod customers;
pub mod employees;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;
pub mod shippers;
pub mod suppliers;

/// Reads the `force` override flag used by delete endpoints.
fn force_flag(params: &BTreeMap<String, String>) -> bool {
    params
        .get("force")
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}
