//! In-memory invoice document and the edits a user can apply to it.
//!
//! Every mutation replaces the stored [`Invoice`] with a snapshot produced by
//! [`billing::recompute`], so the totals read back are always those of the
//! current items and flags.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::billing;
use crate::errors::EditError;
use crate::models::{Invoice, LineItem};

pub struct InvoiceEditor {
    invoice: Invoice,
    items: Vec<LineItem>,
}

impl InvoiceEditor {
    pub fn new(invoice: Invoice, items: Vec<LineItem>) -> Result<Self, EditError> {
        let invoice = billing::recompute(&invoice, &items)?;
        Ok(Self { invoice, items })
    }

    /// The document a fresh session starts with: one installation item.
    pub fn seeded(date: NaiveDate, number: &str, show_hours: bool, apply_tax: bool) -> Result<Self, EditError> {
        let seed = LineItem::new(
            Decimal::from(50),
            "Std.",
            "Installation services",
            Decimal::from(50),
        )
        .with_position(1);

        Self::new(Invoice::new(date, number, show_hours, apply_tax), vec![seed])
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_show_hours(&mut self, show_hours: bool) -> Result<(), EditError> {
        let header = Invoice {
            show_hours,
            ..self.invoice.clone()
        };
        self.commit_header(header, "hours")
    }

    pub fn toggle_show_hours(&mut self) -> Result<(), EditError> {
        self.set_show_hours(!self.invoice.show_hours)
    }

    pub fn set_apply_tax(&mut self, apply_tax: bool) -> Result<(), EditError> {
        let header = Invoice {
            apply_tax,
            ..self.invoice.clone()
        };
        self.commit_header(header, "tax")
    }

    pub fn toggle_apply_tax(&mut self) -> Result<(), EditError> {
        self.set_apply_tax(!self.invoice.apply_tax)
    }

    pub fn set_number(&mut self, number: &str) -> Result<(), EditError> {
        let number = number.trim();
        if number.is_empty() {
            return Err(EditError::EmptyNumber);
        }

        let header = Invoice {
            number: number.to_string(),
            ..self.invoice.clone()
        };
        self.commit_header(header, "number")
    }

    pub fn set_date(&mut self, date: NaiveDate) -> Result<(), EditError> {
        let header = Invoice {
            date,
            ..self.invoice.clone()
        };
        self.commit_header(header, "date")
    }

    /// Append `item` at the end; it is numbered `len + 1`.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), EditError> {
        let position = self.items.len() as u32 + 1;
        let mut items = self.items.clone();
        items.push(item.with_position(position));
        self.commit(self.invoice.clone(), items, "add")
    }

    /// Replace the item at `index`. A replacement without a position keeps the
    /// position of the item it replaces.
    pub fn edit_item(&mut self, index: usize, item: LineItem) -> Result<(), EditError> {
        let len = self.items.len();
        let old = self
            .items
            .get(index)
            .ok_or(EditError::NoSuchItem { index, len })?;

        let position = item.position.or(old.position);
        let mut items = self.items.clone();
        items[index] = LineItem { position, ..item };
        self.commit(self.invoice.clone(), items, "edit")
    }

    /// Remove the item at `index` if `confirm` agrees. The remaining items are
    /// renumbered in order.
    ///
    /// Returns the removed item, or `None` when the removal was declined.
    pub fn delete_item<F>(&mut self, index: usize, confirm: F) -> Result<Option<LineItem>, EditError>
    where
        F: FnOnce(&LineItem) -> bool,
    {
        let len = self.items.len();
        let item = self
            .items
            .get(index)
            .ok_or(EditError::NoSuchItem { index, len })?;

        if !confirm(item) {
            debug!(index, "deletion declined");
            return Ok(None);
        }

        let mut items = self.items.clone();
        let removed = items.remove(index);
        for (i, item) in items.iter_mut().enumerate() {
            item.position = Some(i as u32 + 1);
        }
        self.commit(self.invoice.clone(), items, "delete")?;
        Ok(Some(removed))
    }

    fn commit_header(&mut self, header: Invoice, cause: &str) -> Result<(), EditError> {
        let items = self.items.clone();
        self.commit(header, items, cause)
    }

    // Nothing is stored unless the new totals can be computed.
    fn commit(&mut self, header: Invoice, items: Vec<LineItem>, cause: &str) -> Result<(), EditError> {
        let invoice = billing::recompute(&header, &items)?;
        self.invoice = invoice;
        self.items = items;
        debug!(
            cause,
            items = self.items.len(),
            subtotal = %self.invoice.subtotal,
            tax = %self.invoice.tax_amount,
            "invoice recomputed"
        );
        Ok(())
    }
}
