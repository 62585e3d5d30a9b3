use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tracing::{info, warn};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::billing;
use crate::editor::InvoiceEditor;
use crate::errors::EditError;
use crate::format::{format_currency, format_date};
use crate::ui::components::date_input::DateInputState;
use crate::ui::components::popup::{render_confirm, render_error};
use crate::ui::item_form::{self, FormMode, ItemFormAction, ItemFormState, render_item_form};

// Header field currently being typed into
enum HeaderEdit {
    Number(String),
    Date(DateInputState),
}

// Represents the state of the invoice screen
pub struct InvoiceScreenState {
    editor: InvoiceEditor,
    table_state: TableState,
    item_form: Option<ItemFormState>,
    pending_delete: Option<usize>,
    header_edit: Option<HeaderEdit>,
    show_error: Option<String>,
    status: Option<String>,
}

pub enum InvoiceAction {
    Quit,
    Print,
}

impl InvoiceScreenState {
    pub fn new(editor: InvoiceEditor) -> Self {
        let mut table_state = TableState::default();
        if !editor.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            editor,
            table_state,
            item_form: None,
            pending_delete: None,
            header_edit: None,
            show_error: None,
            status: None,
        }
    }

    pub fn editor(&self) -> &InvoiceEditor {
        &self.editor
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.show_error = Some(error.into());
    }

    pub fn next(&mut self) {
        let len = self.editor.len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.editor.len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    fn open_add_form(&mut self) {
        self.item_form = Some(ItemFormState::add());
    }

    fn open_edit_form(&mut self) {
        if let Some(index) = self.selected() {
            if let Some(item) = self.editor.item(index) {
                self.item_form = Some(ItemFormState::edit(index, item));
            }
        }
    }

    fn request_delete(&mut self) {
        if let Some(index) = self.selected() {
            if index < self.editor.len() {
                self.pending_delete = Some(index);
            }
        }
    }

    fn resolve_delete(&mut self, index: usize, confirmed: bool) {
        match self.editor.delete_item(index, |_| confirmed) {
            Ok(Some(removed)) => {
                info!(index, description = %removed.description, "line item deleted");
                self.clamp_selection();
                self.set_status(format!("Deleted row {}", index + 1));
            }
            Ok(None) => {}
            Err(err) => self.reject(err),
        }
    }

    fn apply_form(&mut self, action: ItemFormAction) {
        match action {
            ItemFormAction::Cancel => {}
            ItemFormAction::Submit(FormMode::Add, item) => match self.editor.add_item(item) {
                Ok(()) => {
                    self.table_state.select(Some(self.editor.len() - 1));
                    self.set_status("Record added");
                }
                Err(err) => self.reject(err),
            },
            ItemFormAction::Submit(FormMode::Edit(index), item) => match self.editor.edit_item(index, item) {
                Ok(()) => self.set_status(format!("Row {} updated", index + 1)),
                Err(err) => self.reject(err),
            },
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.editor.len();
        if len == 0 {
            self.table_state.select(None);
        } else if let Some(selected) = self.table_state.selected() {
            self.table_state.select(Some(selected.min(len - 1)));
        }
    }

    fn reject(&mut self, err: EditError) {
        warn!(error = %err, "edit rejected");
        self.show_error = Some(err.to_string());
    }
}

/// Apply one key press to the screen state
pub fn handle_key(state: &mut InvoiceScreenState, key: KeyCode) -> Option<InvoiceAction> {
    // The error popup swallows one key
    if state.show_error.take().is_some() {
        return None;
    }

    if let Some(index) = state.pending_delete.take() {
        let confirmed = matches!(key, KeyCode::Char('y') | KeyCode::Char('Y'));
        state.resolve_delete(index, confirmed);
        return None;
    }

    if let Some(form) = &mut state.item_form {
        if let Some(action) = item_form::handle_key(form, key) {
            state.item_form = None;
            state.apply_form(action);
        }
        return None;
    }

    if let Some(edit) = state.header_edit.take() {
        state.header_edit = handle_header_key(state, edit, key);
        return None;
    }

    state.status = None;
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(InvoiceAction::Quit),
        KeyCode::Char('p') => return Some(InvoiceAction::Print),
        KeyCode::Char('a') => state.open_add_form(),
        KeyCode::Char('e') | KeyCode::Enter => state.open_edit_form(),
        KeyCode::Char('d') | KeyCode::Delete => state.request_delete(),
        KeyCode::Char('h') => {
            if let Err(err) = state.editor.toggle_show_hours() {
                state.reject(err);
            }
        }
        KeyCode::Char('t') => {
            if let Err(err) = state.editor.toggle_apply_tax() {
                state.reject(err);
            }
        }
        KeyCode::Char('n') => {
            state.header_edit = Some(HeaderEdit::Number(state.editor.invoice().number.clone()));
        }
        KeyCode::Char('c') => {
            state.header_edit = Some(HeaderEdit::Date(DateInputState::new(state.editor.invoice().date)));
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }

    None
}

// Returns the edit to keep open, or None once it is committed or cancelled
fn handle_header_key(state: &mut InvoiceScreenState, edit: HeaderEdit, key: KeyCode) -> Option<HeaderEdit> {
    match (edit, key) {
        (_, KeyCode::Esc) => None,
        (HeaderEdit::Number(value), KeyCode::Enter) => match state.editor.set_number(&value) {
            Ok(()) => None,
            Err(err) => {
                state.reject(err);
                Some(HeaderEdit::Number(value))
            }
        },
        (HeaderEdit::Number(mut value), KeyCode::Char(c)) => {
            value.push(c);
            Some(HeaderEdit::Number(value))
        }
        (HeaderEdit::Number(mut value), KeyCode::Backspace) => {
            value.pop();
            Some(HeaderEdit::Number(value))
        }
        (HeaderEdit::Date(date_state), KeyCode::Enter) => match state.editor.set_date(date_state.date) {
            Ok(()) => None,
            Err(err) => {
                state.reject(err);
                Some(HeaderEdit::Date(date_state))
            }
        },
        (HeaderEdit::Date(mut date_state), key) => {
            date_state.handle_input(key);
            Some(HeaderEdit::Date(date_state))
        }
        (edit, _) => Some(edit),
    }
}

pub fn handle_input(state: &mut InvoiceScreenState) -> Result<Option<InvoiceAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

pub fn render_invoice<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceScreenState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // Header
            Constraint::Min(4),     // Items
            Constraint::Length(5),  // Summary
            Constraint::Length(3),  // Help
        ])
        .split(frame.size());

    render_header(frame, state, chunks[0]);
    render_items(frame, state, chunks[1]);
    render_summary(frame, state, chunks[2]);

    let footer = match &state.status {
        Some(status) => Paragraph::new(status.as_str()).style(Style::default().fg(Color::Green)),
        None => Paragraph::new(help_text(state)).style(Style::default().fg(Color::Gray)),
    };
    frame.render_widget(footer.block(Block::default().borders(Borders::ALL)), chunks[3]);

    if let Some(form) = &state.item_form {
        render_item_form(frame, form);
    }

    if let Some(index) = state.pending_delete {
        let detail = state
            .editor
            .item(index)
            .map(|item| format!("Delete row {}: {}", index + 1, item.description))
            .unwrap_or_default();
        render_confirm(frame, "Are you sure?", &detail);
    }

    if let Some(error) = &state.show_error {
        render_error(frame, error);
    }
}

fn help_text(state: &InvoiceScreenState) -> &'static str {
    match &state.header_edit {
        Some(HeaderEdit::Number(_)) => "Enter - Save number | Esc - Cancel",
        Some(HeaderEdit::Date(_)) => "Enter - Save date | Left/Right - Switch date part | Esc - Cancel",
        None => "<A> Add | <E> Edit | <D> Delete | <H> Hours | <T> Tax | <N> Number | <C> Date | <P> Print | <Q> Quit",
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn render_header<B: Backend>(frame: &mut Frame<B>, state: &InvoiceScreenState, area: Rect) {
    let invoice = state.editor.invoice();
    let editing = Style::default().fg(Color::Yellow);

    let (date_value, date_style) = match &state.header_edit {
        Some(HeaderEdit::Date(date_state)) => (date_state.get_display_string(), editing),
        _ => (format_date(invoice.date), Style::default()),
    };
    let (number_value, number_style) = match &state.header_edit {
        Some(HeaderEdit::Number(value)) => (format!("{}|", value), editing),
        _ => (invoice.number.clone(), Style::default()),
    };

    let lines = vec![
        Spans::from(vec![Span::raw("Date: "), Span::styled(date_value, date_style)]),
        Spans::from(vec![Span::raw("Invoice no.: "), Span::styled(number_value, number_style)]),
        Spans::from(format!(
            "{} Hours   {} Tax",
            checkbox(invoice.show_hours),
            checkbox(invoice.apply_tax)
        )),
    ];

    let header = Paragraph::new(lines).block(Block::default().title("Invoice").borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_items<B: Backend>(frame: &mut Frame<B>, state: &mut InvoiceScreenState, area: Rect) {
    let show_hours = state.editor.invoice().show_hours;
    let quantity_style = if show_hours {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    };

    let header_cells = ["Pos.", "Qty", "Unit", "Description", "Unit price", "Total price"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = state.editor.items().iter().enumerate().map(|(index, item)| {
        let cells = vec![
            Cell::from(item.display_position(index).to_string()),
            Cell::from(item.quantity.to_string()).style(quantity_style),
            Cell::from(item.unit.clone()),
            Cell::from(item.description.clone()),
            Cell::from(format_currency(item.unit_price)),
            Cell::from(
                billing::line_total(item, show_hours)
                    .map(format_currency)
                    .unwrap_or_default(),
            ),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Line Items").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[
            Constraint::Percentage(7),
            Constraint::Percentage(9),
            Constraint::Percentage(9),
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ]);

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

fn render_summary<B: Backend>(frame: &mut Frame<B>, state: &InvoiceScreenState, area: Rect) {
    let invoice = state.editor.invoice();
    let mut content = Vec::new();

    if state.editor.is_empty() {
        content.push(Spans::from("No line items added yet"));
    } else {
        content.push(Spans::from(format!("Subtotal: {}", format_currency(invoice.subtotal))));
        if invoice.apply_tax {
            content.push(Spans::from(format!(
                "VAT {}%: {}",
                billing::tax_percent(),
                format_currency(invoice.tax_amount)
            )));
        }
        content.push(Spans::from(Span::styled(
            format!("Total: {}", format_currency(invoice.total())),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    let summary = Paragraph::new(content).block(Block::default().title("Summary").borders(Borders::ALL));
    frame.render_widget(summary, area);
}
