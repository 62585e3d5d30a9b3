use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2} EUR", rounded)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_has_two_decimals() {
        assert_eq!(format_currency(Decimal::from(2975)), "2975.00 EUR");
        assert_eq!(format_currency(Decimal::new(12345, 3)), "12.35 EUR");
        assert_eq!(format_currency(Decimal::new(-5, 1)), "-0.50 EUR");
    }

    #[test]
    fn date_is_day_first() {
        let date = NaiveDate::from_ymd_opt(2021, 12, 17).unwrap();
        assert_eq!(format_date(date), "17.12.2021");
    }
}
