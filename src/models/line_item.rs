use rust_decimal::Decimal;

/// One billable row on the invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Display order: `len + 1` when appended, renumbered after a delete.
    /// This is the "Pos." shown on screen and in print.
    pub position: Option<u32>,
    pub quantity: Decimal,
    pub unit: String,
    pub description: String,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn new(quantity: Decimal, unit: &str, description: &str, unit_price: Decimal) -> Self {
        Self {
            position: None,
            quantity,
            unit: unit.to_string(),
            description: description.to_string(),
            unit_price,
        }
    }

    pub fn with_position(self, position: u32) -> Self {
        Self {
            position: Some(position),
            ..self
        }
    }

    /// Position to print, falling back to the row number for unnumbered items
    pub fn display_position(&self, index: usize) -> u32 {
        self.position.unwrap_or(index as u32 + 1)
    }
}
