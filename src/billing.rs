//! Derivation of invoice totals from the line items and the display flags.

use rust_decimal::Decimal;

use crate::errors::EditError;
use crate::models::{Invoice, LineItem};

/// VAT rate applied when the invoice is taxable (19 %).
pub const TAX_RATE: Decimal = Decimal::from_parts(19, 0, 0, false, 2);

/// The tax rate as a whole percentage, for labels.
pub fn tax_percent() -> Decimal {
    (TAX_RATE * Decimal::ONE_HUNDRED).normalize()
}

/// Contribution of a single item to the subtotal.
///
/// With hours hidden every item counts once at its unit price.
pub fn line_total(item: &LineItem, show_hours: bool) -> Result<Decimal, EditError> {
    if show_hours {
        item.unit_price
            .checked_mul(item.quantity)
            .ok_or(EditError::AmountTooLarge)
    } else {
        Ok(item.unit_price)
    }
}

/// Return a new snapshot of `invoice` whose totals match `items`.
///
/// Fails when any amount, including the final total, leaves the `Decimal` range.
pub fn recompute(invoice: &Invoice, items: &[LineItem]) -> Result<Invoice, EditError> {
    let mut subtotal = Decimal::ZERO;
    for item in items {
        subtotal = subtotal
            .checked_add(line_total(item, invoice.show_hours)?)
            .ok_or(EditError::AmountTooLarge)?;
    }

    let tax_amount = if invoice.apply_tax {
        subtotal.checked_mul(TAX_RATE).ok_or(EditError::AmountTooLarge)?
    } else {
        Decimal::ZERO
    };

    // Invoice::total must not overflow either
    subtotal.checked_add(tax_amount).ok_or(EditError::AmountTooLarge)?;

    Ok(Invoice {
        subtotal,
        tax_amount,
        ..invoice.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn header(show_hours: bool, apply_tax: bool) -> Invoice {
        let date = NaiveDate::from_ymd_opt(2021, 12, 17).unwrap();
        Invoice::new(date, "240005", show_hours, apply_tax)
    }

    fn item(quantity: i64, unit_price: i64) -> LineItem {
        LineItem::new(Decimal::from(quantity), "Std.", "work", Decimal::from(unit_price))
    }

    #[test]
    fn seed_item_totals() {
        let invoice = recompute(&header(true, true), &[item(50, 50)]).unwrap();

        assert_eq!(invoice.subtotal, Decimal::from(2500));
        assert_eq!(invoice.tax_amount, Decimal::from(475));
        assert_eq!(invoice.total(), Decimal::from(2975));
    }

    #[test]
    fn empty_collection_has_zero_totals() {
        let invoice = recompute(&header(true, true), &[]).unwrap();

        assert_eq!(invoice.subtotal, Decimal::ZERO);
        assert_eq!(invoice.tax_amount, Decimal::ZERO);
    }

    #[test]
    fn hidden_hours_count_each_item_once() {
        let items = [item(50, 50), item(3, 20)];
        let invoice = recompute(&header(false, false), &items).unwrap();

        assert_eq!(invoice.subtotal, Decimal::from(70));
    }

    #[test]
    fn hidden_hours_with_tax_over_several_items() {
        let items = [item(50, 50), item(3, 20), item(12, 30)];
        let invoice = recompute(&header(false, true), &items).unwrap();

        assert_eq!(invoice.subtotal, Decimal::from(100));
        assert_eq!(invoice.tax_amount, Decimal::from(19));
        assert_eq!(invoice.total(), Decimal::from(119));
    }

    #[test]
    fn tax_off_is_exactly_zero() {
        let invoice = recompute(&header(true, false), &[item(7, 13)]).unwrap();

        assert_eq!(invoice.subtotal, Decimal::from(91));
        assert!(invoice.tax_amount.is_zero());
    }

    #[test]
    fn fractional_amounts_stay_exact() {
        let items = [LineItem::new(
            Decimal::new(15, 1),
            "Std.",
            "consulting",
            Decimal::new(3333, 2),
        )];
        let invoice = recompute(&header(true, true), &items).unwrap();

        // 1.5 * 33.33
        assert_eq!(invoice.subtotal, Decimal::new(49995, 3));
        assert_eq!(invoice.tax_amount, Decimal::new(49995, 3) * TAX_RATE);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = [item(2, 10), item(1, 99), item(4, 3)];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(
            recompute(&header(true, true), &forward),
            recompute(&header(true, true), &backward)
        );
    }

    #[test]
    fn negative_values_are_accepted() {
        let invoice = recompute(&header(true, false), &[item(2, 50), item(1, -30)]).unwrap();

        assert_eq!(invoice.subtotal, Decimal::from(70));
    }

    #[test]
    fn recompute_leaves_header_fields_alone() {
        let original = header(true, true);
        let updated = recompute(&original, &[item(1, 10)]).unwrap();

        assert_eq!(updated.number, original.number);
        assert_eq!(updated.date, original.date);
        assert_eq!(original.subtotal, Decimal::ZERO);
    }

    #[test]
    fn oversized_product_is_an_error() {
        let huge = Decimal::from_i128_with_scale(99_999_999_999_999_999_999, 0);
        let items = [LineItem::new(huge, "Std.", "work", huge)];

        assert_eq!(recompute(&header(true, false), &items), Err(EditError::AmountTooLarge));
        assert_eq!(line_total(&items[0], true), Err(EditError::AmountTooLarge));
        assert_eq!(line_total(&items[0], false), Ok(huge));
    }

    #[test]
    fn subtotal_at_the_decimal_limit() {
        let max = [LineItem::new(Decimal::ONE, "Std.", "work", Decimal::MAX)];

        let untaxed = recompute(&header(false, false), &max).unwrap();
        assert_eq!(untaxed.total(), Decimal::MAX);

        // the tax would push the total past the limit
        assert_eq!(recompute(&header(false, true), &max), Err(EditError::AmountTooLarge));

        let doubled = [max[0].clone(), max[0].clone()];
        assert_eq!(recompute(&header(false, false), &doubled), Err(EditError::AmountTooLarge));
    }

    #[test]
    fn tax_percent_is_whole_number() {
        assert_eq!(tax_percent().to_string(), "19");
    }
}
