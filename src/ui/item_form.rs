//! Add/edit form for a single line item, shown as a popup over the invoice.

use crossterm::event::KeyCode;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::errors::EditError;
use crate::models::LineItem;
use crate::ui::components::popup::centered_rect;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ItemField {
    Quantity,
    Unit,
    Description,
    UnitPrice,
}

impl ItemField {
    const ALL: [ItemField; 4] = [
        ItemField::Quantity,
        ItemField::Unit,
        ItemField::Description,
        ItemField::UnitPrice,
    ];

    fn label(self) -> &'static str {
        match self {
            ItemField::Quantity => "Quantity",
            ItemField::Unit => "Unit",
            ItemField::Description => "Description",
            ItemField::UnitPrice => "Unit price",
        }
    }

    fn index(self) -> usize {
        match self {
            ItemField::Quantity => 0,
            ItemField::Unit => 1,
            ItemField::Description => 2,
            ItemField::UnitPrice => 3,
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, ItemField::Quantity | ItemField::UnitPrice)
    }
}

/// Whether the form creates a new item or replaces the one at an index
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FormMode {
    Add,
    Edit(usize),
}

pub struct ItemFormState {
    mode: FormMode,
    values: [String; 4],
    current_field: ItemField,
    error: Option<String>,
}

pub enum ItemFormAction {
    Cancel,
    Submit(FormMode, LineItem),
}

impl ItemFormState {
    pub fn add() -> Self {
        Self {
            mode: FormMode::Add,
            values: Default::default(),
            current_field: ItemField::Quantity,
            error: None,
        }
    }

    /// Open the form pre-filled with `item`
    pub fn edit(index: usize, item: &LineItem) -> Self {
        Self {
            mode: FormMode::Edit(index),
            values: [
                item.quantity.to_string(),
                item.unit.clone(),
                item.description.clone(),
                item.unit_price.to_string(),
            ],
            current_field: ItemField::Quantity,
            error: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn current_field(&self) -> ItemField {
        self.current_field
    }

    pub fn value(&self, field: ItemField) -> &str {
        &self.values[field.index()]
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn next_field(&mut self) {
        let next = (self.current_field.index() + 1) % ItemField::ALL.len();
        self.current_field = ItemField::ALL[next];
    }

    pub fn previous_field(&mut self) {
        let len = ItemField::ALL.len();
        let previous = (self.current_field.index() + len - 1) % len;
        self.current_field = ItemField::ALL[previous];
    }

    /// Parse the form into a line item
    pub fn to_line_item(&self) -> Result<LineItem, EditError> {
        let quantity = parse_decimal(ItemField::Quantity, self.value(ItemField::Quantity))?;
        let unit_price = parse_decimal(ItemField::UnitPrice, self.value(ItemField::UnitPrice))?;

        Ok(LineItem::new(
            quantity,
            self.value(ItemField::Unit).trim(),
            self.value(ItemField::Description).trim(),
            unit_price,
        ))
    }

    fn edit_current_field(&mut self, key: KeyCode) {
        let field = self.current_field;
        let value = &mut self.values[field.index()];
        match key {
            KeyCode::Char(c) if !field.is_numeric() || c.is_ascii_digit() || matches!(c, '.' | ',' | '-') => {
                value.push(c);
            }
            KeyCode::Backspace => {
                value.pop();
            }
            _ => {}
        }
    }
}

fn parse_decimal(field: ItemField, input: &str) -> Result<Decimal, EditError> {
    let normalized = input.trim().replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| EditError::InvalidNumber {
        field: field.label(),
        input: input.to_string(),
    })
}

pub fn handle_key(state: &mut ItemFormState, key: KeyCode) -> Option<ItemFormAction> {
    state.error = None;

    match key {
        KeyCode::Esc => return Some(ItemFormAction::Cancel),
        KeyCode::Enter => match state.to_line_item() {
            Ok(item) => return Some(ItemFormAction::Submit(state.mode, item)),
            Err(err) => {
                warn!(error = %err, "line item rejected");
                state.error = Some(err.to_string());
            }
        },
        KeyCode::Tab | KeyCode::Down => state.next_field(),
        KeyCode::BackTab | KeyCode::Up => state.previous_field(),
        _ => state.edit_current_field(key),
    }

    None
}

pub fn render_item_form<B: Backend>(frame: &mut Frame<B>, state: &ItemFormState) {
    let area = centered_rect(60, 70, frame.size());
    let title = match state.mode {
        FormMode::Add => "Add record".to_string(),
        FormMode::Edit(index) => format!("Edit record {}", index + 1),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    for field in ItemField::ALL {
        render_field(frame, state, field, chunks[field.index()]);
    }

    let footer = match state.error() {
        Some(error) => Paragraph::new(error).style(Style::default().fg(Color::Red)),
        None => Paragraph::new("Enter - Save | Tab/Up/Down - Switch field | Esc - Cancel")
            .style(Style::default().fg(Color::Gray)),
    };
    frame.render_widget(footer, chunks[4]);
}

fn render_field<B: Backend>(frame: &mut Frame<B>, state: &ItemFormState, field: ItemField, area: Rect) {
    let active = state.current_field == field;
    let label_style = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let value = if active {
        format!("{}|", state.value(field))
    } else {
        state.value(field).to_string()
    };

    let paragraph = Paragraph::new(Spans::from(vec![
        Span::styled(format!("{}: ", field.label()), label_style),
        Span::raw(value),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn type_text(state: &mut ItemFormState, text: &str) {
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
    }

    fn fill(state: &mut ItemFormState, values: [&str; 4]) {
        for value in values {
            type_text(state, value);
            handle_key(state, KeyCode::Tab);
        }
    }

    #[test]
    fn add_form_submits_parsed_item() {
        let mut state = ItemFormState::add();
        fill(&mut state, ["2,5", "Std.", "Maintenance", "80"]);

        match handle_key(&mut state, KeyCode::Enter) {
            Some(ItemFormAction::Submit(FormMode::Add, item)) => {
                assert_eq!(
                    item,
                    LineItem::new(Decimal::new(25, 1), "Std.", "Maintenance", Decimal::from(80))
                );
            }
            _ => panic!("expected a submitted item"),
        }
    }

    #[test]
    fn numeric_fields_ignore_letters() {
        let mut state = ItemFormState::add();

        type_text(&mut state, "1x2");

        assert_eq!(state.value(ItemField::Quantity), "12");
    }

    #[test]
    fn empty_price_is_rejected_with_message() {
        let mut state = ItemFormState::add();
        fill(&mut state, ["3", "pcs", "Valve", ""]);

        assert!(handle_key(&mut state, KeyCode::Enter).is_none());
        assert_eq!(state.error(), Some("Invalid Unit price: '' is not a number"));

        // any further key clears the message
        handle_key(&mut state, KeyCode::Char('5'));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn malformed_quantity_is_rejected() {
        let mut state = ItemFormState::add();
        fill(&mut state, ["1..2", "pcs", "Valve", "4"]);

        assert_eq!(
            state.to_line_item(),
            Err(EditError::InvalidNumber {
                field: "Quantity",
                input: "1..2".to_string()
            })
        );
    }

    #[test]
    fn edit_form_is_prefilled() {
        let item = LineItem::new(Decimal::from(50), "Std.", "Installation services", Decimal::from(50));
        let state = ItemFormState::edit(0, &item);

        assert_eq!(state.mode(), FormMode::Edit(0));
        assert_eq!(state.value(ItemField::Description), "Installation services");
        assert_eq!(state.to_line_item(), Ok(item));
    }

    #[test]
    fn field_navigation_wraps() {
        let mut state = ItemFormState::add();

        state.previous_field();
        assert_eq!(state.current_field(), ItemField::UnitPrice);

        handle_key(&mut state, KeyCode::Down);
        assert_eq!(state.current_field(), ItemField::Quantity);
    }

    #[test]
    fn escape_cancels() {
        let mut state = ItemFormState::add();
        type_text(&mut state, "7");

        assert!(matches!(handle_key(&mut state, KeyCode::Esc), Some(ItemFormAction::Cancel)));
    }
}
