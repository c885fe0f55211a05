use northwind_core::{AppResult, Violations};

/// A shipping company row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipper {
    shipper_id: i32,
    company_name: String,
    phone: Option<String>,
}

impl Shipper {
    /// Creates a validated shipper.
    pub fn new(
        shipper_id: i32,
        company_name: impl Into<String>,
        phone: Option<String>,
    ) -> AppResult<Self> {
        let company_name = company_name.into();
        let mut violations = Violations::new();

        if company_name.trim().is_empty() {
            violations.push("companyName", "is required");
        } else if company_name.len() > 40 {
            violations.push("companyName", "must be at most 40 characters");
        }

        violations.into_result(Self {
            shipper_id,
            company_name,
            phone,
        })
    }

    /// Returns the shipper identifier.
    #[must_use]
    pub fn shipper_id(&self) -> i32 {
        self.shipper_id
    }

    /// Returns the company name.
    #[must_use]
    pub fn company_name(&self) -> &str {
        self.company_name.as_str()
    }

    /// Returns the phone number.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}
