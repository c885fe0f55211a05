use northwind_core::{AppResult, Violations};
use rust_decimal::Decimal;

/// Spend-based classification attached to customer ranking reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerTier {
    /// Lifetime spend of at least 10 000.
    Platinum,
    /// Lifetime spend of at least 5 000.
    Gold,
    /// Lifetime spend of at least 1 000.
    Silver,
    /// Everyone else.
    Bronze,
}

impl CustomerTier {
    /// Classifies lifetime spend into a tier.
    #[must_use]
    pub fn classify(total_spend: Decimal) -> Self {
        if total_spend >= Decimal::from(10_000) {
            Self::Platinum
        } else if total_spend >= Decimal::from(5_000) {
            Self::Gold
        } else if total_spend >= Decimal::from(1_000) {
            Self::Silver
        } else {
            Self::Bronze
        }
    }

    /// Returns the display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Platinum => "Platinum",
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
        }
    }
}

/// A customer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    customer_id: i32,
    company_name: String,
    contact_name: Option<String>,
    city: Option<String>,
    country: Option<String>,
    phone: Option<String>,
}

impl Customer {
    /// Creates a validated customer.
    pub fn new(
        customer_id: i32,
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
            customer_id,
            company_name,
            contact_name,
            city,
            country,
            phone,
        })
    }

    /// Returns the customer identifier.
    #[must_use]
    pub fn customer_id(&self) -> i32 {
        self.customer_id
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
    use rust_decimal_macros::dec;

    use super::{Customer, CustomerTier};

    #[test]
    fn tier_thresholds_are_inclusive() {
        assert_eq!(CustomerTier::classify(dec!(10000)), CustomerTier::Platinum);
        assert_eq!(CustomerTier::classify(dec!(9999.99)), CustomerTier::Gold);
        assert_eq!(CustomerTier::classify(dec!(5000)), CustomerTier::Gold);
        assert_eq!(CustomerTier::classify(dec!(1000)), CustomerTier::Silver);
        assert_eq!(CustomerTier::classify(dec!(999.99)), CustomerTier::Bronze);
        assert_eq!(CustomerTier::classify(dec!(0)), CustomerTier::Bronze);
    }

    #[test]
    fn company_name_is_required() {
        assert!(Customer::new(1, "", None, None, None, None).is_err());
    }
}
