use northwind_core::{AppResult, Violations};

/// A supplier row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supplier {
    supplier_id: i32,
    company_name: String,
    contact_name: Option<String>,
    city: Option<String>,
    country: Option<String>,
    phone: Option<String>,
}

impl Supplier {
    /// Creates a validated supplier.
    pub fn new(
        supplier_id: i32,
        company_name: impl Into<String>,
        contact_name: Option<String>,
        city: Option<String>,
        country: Option<String>,
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
            supplier_id,
            company_name,
            contact_name,
            city,
            country,
            phone,
        })
    }

    /// Returns the supplier identifier.
    #[must_use]
    pub fn supplier_id(&self) -> i32 {
        self.supplier_id
    }

    /// Returns the company name.
    #[must_use]
    pub fn company_name(&self) -> &str {
        self.company_name.as_str()
    }

    /// Returns the contact person, when known.
    #[must_use]
    pub fn contact_name(&self) -> Option<&str> {
        self.contact_name.as_deref()
    }

    /// Returns the city.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Returns the country.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Returns the phone number.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::Supplier;

    #[test]
    fn company_name_is_required() {
        assert!(Supplier::new(1, "   ", None, None, None, None).is_err());
    }
}
