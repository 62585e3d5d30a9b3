use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Header of the invoice together with its derived totals.
///
/// `subtotal` and `tax_amount` are only ever written by
/// [`crate::billing::recompute`], which returns a fresh snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub date: NaiveDate,
    pub number: String,
    pub show_hours: bool,
    pub apply_tax: bool,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
}

impl Invoice {
    /// Create a header with zeroed totals
    pub fn new(date: NaiveDate, number: &str, show_hours: bool, apply_tax: bool) -> Self {
        Self {
            date,
            number: number.to_string(),
            show_hours,
            apply_tax,
            subtotal: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
        }
    }

    /// Amount due: subtotal plus tax
    pub fn total(&self) -> Decimal {
        self.subtotal + self.tax_amount
    }
}
