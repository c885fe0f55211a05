use northwind_application::{CreateCustomer, CustomerView, UpdateCustomer};
use northwind_domain::Customer;
use serde::{Deserialize, Serialize};

use super::common::double_option;

/// Bare customer record, used when attached as a relation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub customer_id: i32,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl From<Customer> for CustomerRecord {
    fn from(customer: Customer) -> Self {
        Self {
            customer_id: customer.customer_id(),
            company_name: customer.company_name().to_owned(),
            contact_name: customer.contact_name().map(str::to_owned),
            city: customer.city().map(str::to_owned),
            country: customer.country().map(str::to_owned),
            phone: customer.phone().map(str::to_owned),
        }
    }
}

/// Customer payload with its derived order count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    #[serde(flatten)]
    pub customer: CustomerRecord,
    pub order_count: i64,
}

impl From<CustomerView> for CustomerResponse {
    fn from(view: CustomerView) -> Self {
        Self {
            customer: CustomerRecord::from(view.customer),
            order_count: view.order_count,
        }
    }
}

/// Create-customer request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub company_name: String,
    pub contact_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl From<CreateCustomerRequest> for CreateCustomer {
    fn from(request: CreateCustomerRequest) -> Self {
        Self {
            company_name: request.company_name,
            contact_name: request.contact_name,
            city: request.city,
            country: request.country,
            phone: request.phone,
        }
    }
}

/// Partial update request body for a customer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub city: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
}

impl From<UpdateCustomerRequest> for UpdateCustomer {
    fn from(request: UpdateCustomerRequest) -> Self {
        Self {
            company_name: request.company_name,
            contact_name: request.contact_name,
            city: request.city,
            country: request.country,
            phone: request.phone,
        }
    }
}
