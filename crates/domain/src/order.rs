use chrono::NaiveDate;
use northwind_core::{AppError, AppResult, Violations};
use rust_decimal::Decimal;

/// Derived order state; never a stored column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// No order date recorded yet.
    Pending,
    /// Ordered but not shipped.
    Processing,
    /// Shipped.
    Shipped,
    /// Not shipped and past the required date.
    Overdue,
}

impl OrderStatus {
    /// Parses the transport value used by the `status` filter.
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "overdue" => Ok(Self::Overdue),
            _ => Err(AppError::invalid_field(
                "status",
                format!(
                    "unknown status '{value}', expected pending, processing, shipped or overdue"
                ),
            )),
        }
    }

    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Overdue => "overdue",
        }
    }

    /// Classifies an order for display.
    ///
    /// An unshipped order past its required date reads as overdue even
    /// though it also satisfies the pending/processing rules; shipped wins
    /// over everything.
    #[must_use]
    pub fn classify(
        order_date: Option<NaiveDate>,
        shipped_date: Option<NaiveDate>,
        required_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        if shipped_date.is_some() {
            Self::Shipped
        } else if required_date.is_some_and(|required| required < today) {
            Self::Overdue
        } else if order_date.is_some() {
            Self::Processing
        } else {
            Self::Pending
        }
    }
}

/// Discounted extended price for one order line, in decimal arithmetic.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: i16, discount: Decimal) -> Decimal {
    unit_price * Decimal::from(quantity) * (Decimal::ONE - discount)
}

/// Sum of line totals plus freight.
#[must_use]
pub fn order_total<'a>(
    details: impl IntoIterator<Item = &'a OrderDetail>,
    freight: Decimal,
) -> Decimal {
    details
        .into_iter()
        .map(OrderDetail::line_total)
        .sum::<Decimal>()
        + freight
}

/// One line item owned by an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetail {
    order_id: i32,
    product_id: i32,
    unit_price: Decimal,
    quantity: i16,
    discount: Decimal,
}

impl OrderDetail {
    /// Creates a validated order line.
    pub fn new(
        order_id: i32,
        product_id: i32,
        unit_price: Decimal,
        quantity: i16,
        discount: Decimal,
    ) -> AppResult<Self> {
        let mut violations = Violations::new();

        if unit_price < Decimal::ZERO {
            violations.push("unitPrice", "must not be negative");
        }

        if quantity < 1 {
            violations.push("quantity", "must be at least 1");
        }

        if discount < Decimal::ZERO || discount >= Decimal::ONE {
            violations.push("discount", "must be at least 0 and below 1");
        }

        violations.into_result(Self {
            order_id,
            product_id,
            unit_price,
            quantity,
            discount,
        })
    }

    /// Returns the owning order identifier.
    #[must_use]
    pub fn order_id(&self) -> i32 {
        self.order_id
    }

    /// Returns the product reference.
    #[must_use]
    pub fn product_id(&self) -> i32 {
        self.product_id
    }

    /// Returns the captured unit price.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Returns the ordered quantity.
    #[must_use]
    pub fn quantity(&self) -> i16 {
        self.quantity
    }

    /// Returns the discount fraction.
    #[must_use]
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Returns the discounted extended price of this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        line_total(self.unit_price, self.quantity, self.discount)
    }
}

/// An order row; its detail lines are written atomically with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    order_id: i32,
    customer_id: Option<i32>,
    employee_id: Option<i32>,
    order_date: Option<NaiveDate>,
    required_date: Option<NaiveDate>,
    shipped_date: Option<NaiveDate>,
    ship_via: Option<i32>,
    freight: Decimal,
}

impl Order {
    /// Creates a validated order header.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_id: i32,
        customer_id: Option<i32>,
        employee_id: Option<i32>,
        order_date: Option<NaiveDate>,
        required_date: Option<NaiveDate>,
        shipped_date: Option<NaiveDate>,
        ship_via: Option<i32>,
        freight: Decimal,
    ) -> AppResult<Self> {
        let mut violations = Violations::new();

        if freight < Decimal::ZERO {
            violations.push("freight", "must not be negative");
        }

        if let (Some(ordered), Some(shipped)) = (order_date, shipped_date)
            && shipped < ordered
        {
            violations.push("shippedDate", "must not precede orderDate");
        }

        violations.into_result(Self {
            order_id,
            customer_id,
            employee_id,
            order_date,
            required_date,
            shipped_date,
            ship_via,
            freight,
        })
    }

    /// Returns the order identifier.
    #[must_use]
    pub fn order_id(&self) -> i32 {
        self.order_id
    }

    /// Returns the customer reference, when any.
    #[must_use]
    pub fn customer_id(&self) -> Option<i32> {
        self.customer_id
    }

    /// Returns the employee reference, when any.
    #[must_use]
    pub fn employee_id(&self) -> Option<i32> {
        self.employee_id
    }

    /// Returns the order date.
    #[must_use]
    pub fn order_date(&self) -> Option<NaiveDate> {
        self.order_date
    }

    /// Returns the required delivery date.
    #[must_use]
    pub fn required_date(&self) -> Option<NaiveDate> {
        self.required_date
    }

    /// Returns the shipped date.
    #[must_use]
    pub fn shipped_date(&self) -> Option<NaiveDate> {
        self.shipped_date
    }

    /// Returns the shipper reference, when any.
    #[must_use]
    pub fn ship_via(&self) -> Option<i32> {
        self.ship_via
    }

    /// Returns the freight charge.
    #[must_use]
    pub fn freight(&self) -> Decimal {
        self.freight
    }

    /// Classifies this order for display on the given day.
    #[must_use]
    pub fn status_on(&self, today: NaiveDate) -> OrderStatus {
        OrderStatus::classify(
            self.order_date,
            self.shipped_date,
            self.required_date,
            today,
        )
    }
}
