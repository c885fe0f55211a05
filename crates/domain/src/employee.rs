use chrono::{Datelike, NaiveDate};
use northwind_core::{AppResult, Violations};

/// Subtracts whole calendar years from a date, clamping Feb 29 to Feb 28
/// when the target year is not a leap year.
///
/// Age display and age filtering both go through this function so that a
/// person turning exactly the boundary age today lands on the same side of
/// the filter as their displayed age.
#[must_use]
pub fn years_before(date: NaiveDate, years: i32) -> NaiveDate {
    let target_year = date.year() - years;
    date.with_year(target_year).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(target_year, 2, 28)
            .unwrap_or(date)
    })
}

/// Whole years between a birth date and `today`, decremented by one when
/// today's month/day precedes the birthday within the current year.
#[must_use]
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }

    years
}

/// Whole years of service using the average Gregorian year length.
///
/// Intentionally `floor(days / 365.25)` rather than calendar-aware
/// subtraction; tenure is an average-year figure, not a birthday rule.
#[must_use]
pub fn years_of_service(hire_date: NaiveDate, today: NaiveDate) -> i32 {
    let days = (today - hire_date).num_days();
    (days as f64 / 365.25).floor() as i32
}

/// An employee row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    employee_id: i32,
    first_name: String,
    last_name: String,
    title: Option<String>,
    birth_date: Option<NaiveDate>,
    hire_date: Option<NaiveDate>,
    city: Option<String>,
    country: Option<String>,
    reports_to: Option<i32>,
}

impl Employee {
    /// Creates a validated employee, reporting every violated field at once.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        employee_id: i32,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        title: Option<String>,
        birth_date: Option<NaiveDate>,
        hire_date: Option<NaiveDate>,
        city: Option<String>,
        country: Option<String>,
        reports_to: Option<i32>,
    ) -> AppResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let mut violations = Violations::new();

        if first_name.trim().is_empty() {
            violations.push("firstName", "is required");
        } else if first_name.len() > 20 {
            violations.push("firstName", "must be at most 20 characters");
        }

        if last_name.trim().is_empty() {
            violations.push("lastName", "is required");
        } else if last_name.len() > 20 {
            violations.push("lastName", "must be at most 20 characters");
        }

        if let Some(title) = &title
            && title.len() > 30
        {
            violations.push("title", "must be at most 30 characters");
        }

        if let (Some(birth), Some(hire)) = (birth_date, hire_date)
            && hire <= birth
        {
            violations.push("hireDate", "must be after birthDate");
        }

        violations.into_result(Self {
            employee_id,
            first_name,
            last_name,
            title,
            birth_date,
            hire_date,
            city,
            country,
            reports_to,
        })
    }

    /// Returns the employee identifier.
    #[must_use]
    pub fn employee_id(&self) -> i32 {
        self.employee_id
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Returns the job title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the birth date, when recorded.
    #[must_use]
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    /// Returns the hire date, when recorded.
    #[must_use]
    pub fn hire_date(&self) -> Option<NaiveDate> {
        self.hire_date
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

    /// Returns the manager reference, when any.
    #[must_use]
    pub fn reports_to(&self) -> Option<i32> {
        self.reports_to
    }

    /// Returns the employee's age on the given day.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.birth_date.map(|birth| age_in_years(birth, today))
    }

    /// Returns whole years of service on the given day.
    #[must_use]
    pub fn years_of_service_on(&self, today: NaiveDate) -> Option<i32> {
        self.hire_date.map(|hire| years_of_service(hire, today))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::{Employee, age_in_years, years_before, years_of_service};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| unreachable!())
    }

    #[test]
    fn age_counts_the_birthday_itself() {
        assert_eq!(age_in_years(date(1990, 6, 15), date(2024, 6, 15)), 34);
        assert_eq!(age_in_years(date(1990, 6, 15), date(2024, 6, 14)), 33);
    }

    #[test]
    fn service_years_use_average_year_length() {
        let today = date(2024, 6, 1);
        // Ten average years plus a hundred days.
        let hire = today - Duration::days(3752);
        assert_eq!(years_of_service(hire, today), 10);

        // One day short of ten average years.
        let hire = today - Duration::days(3652);
        assert_eq!(years_of_service(hire, today), 9);
    }

    #[test]
    fn years_before_clamps_leap_day() {
        assert_eq!(years_before(date(2024, 2, 29), 1), date(2023, 2, 28));
        assert_eq!(years_before(date(2024, 2, 29), 4), date(2020, 2, 29));
        assert_eq!(years_before(date(2024, 6, 15), 30), date(1994, 6, 15));
    }

    #[test]
    fn filter_bound_matches_displayed_age_at_the_boundary() {
        // A person turning exactly 60 today sits on the inclusive bound.
        let today = date(2024, 6, 15);
        let birth = date(1964, 6, 15);
        assert_eq!(age_in_years(birth, today), 60);
        assert!(birth >= years_before(today, 60));
    }

    #[test]
    fn hire_date_must_follow_birth_date() {
        let result = Employee::new(
            1,
            "Nancy",
            "Davolio",
            None,
            Some(date(1990, 1, 1)),
            Some(date(1989, 1, 1)),
            None,
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn names_are_required() {
        let result = Employee::new(1, "", "", None, None, None, None, None, None);
        match result {
            Err(northwind_core::AppError::Validation(violations)) => {
                assert_eq!(violations.len(), 2);
            }
            _ => panic!("expected a validation failure"),
        }
    }
}
