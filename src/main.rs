mod billing;
mod config;
mod editor;
mod errors;
mod export;
mod format;
mod models;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{builder::NonEmptyStringValueParser, Parser};
use crossterm::{
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::config::Config;
use crate::editor::InvoiceEditor;
use crate::export::InvoiceExporter;
use crate::ui::invoice::{InvoiceScreenState, InvoiceAction, render_invoice, handle_input};

/// Edit an invoice in the terminal and print it to Markdown
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Invoice number
    #[arg(long, default_value = "240005", value_parser = NonEmptyStringValueParser::new())]
    number: String,

    /// Invoice date (YYYY-MM-DD)
    #[arg(long, default_value = "2021-12-17")]
    date: NaiveDate,

    /// Start with VAT switched off
    #[arg(long)]
    no_tax: bool,

    /// Start with the quantity column switched off
    #[arg(long)]
    no_hours: bool,

    /// Write the printable invoice and exit without opening the editor
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = config::init()?;
    init_logging(&config)?;
    info!(number = %args.number, date = %args.date, "starting invoice editor");

    let editor = InvoiceEditor::seeded(args.date, &args.number, !args.no_hours, !args.no_tax)?;

    if args.print {
        let exporter = InvoiceExporter::new(config.export_dir())?;
        let path = exporter.export(editor.invoice(), editor.items())?;
        println!("Invoice written to {}", path.display());
        return Ok(());
    }

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = InvoiceScreenState::new(editor);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut state, &config);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "editor loop failed");
        println!("Error: {}", err);
    }

    info!("invoice editor closed");
    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, state: &mut InvoiceScreenState, config: &Config) -> Result<()> {
    loop {
        terminal.draw(|f| render_invoice(f, state))?;

        match handle_input(state)? {
            Some(InvoiceAction::Quit) => break,
            Some(InvoiceAction::Print) => print_invoice(state, config),
            None => {}
        }
    }

    Ok(())
}

// Export failures are shown in the editor instead of ending the session
fn print_invoice(state: &mut InvoiceScreenState, config: &Config) {
    let editor = state.editor();
    let result = InvoiceExporter::new(config.export_dir())
        .and_then(|exporter| exporter.export(editor.invoice(), editor.items()));

    match result {
        Ok(path) => state.set_status(format!("Printed to {}", path.display())),
        Err(err) => {
            error!(error = %err, "printing failed");
            state.set_error(format!("Printing failed: {}", err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_reproduce_the_seed_invoice() {
        let args = Args::try_parse_from(["invoice_editor"]).unwrap();

        assert_eq!(args.number, "240005");
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2021, 12, 17).unwrap());
        assert!(!args.no_tax && !args.no_hours && !args.print);
    }

    #[test]
    fn flags_and_overrides_parse() {
        let args = Args::try_parse_from([
            "invoice_editor",
            "--number",
            "240010",
            "--date",
            "2024-03-15",
            "--no-tax",
            "--print",
        ])
        .unwrap();

        assert_eq!(args.number, "240010");
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert!(args.no_tax);
        assert!(args.print);
    }

    #[test]
    fn empty_number_and_bad_date_are_rejected() {
        assert!(Args::try_parse_from(["invoice_editor", "--number", ""]).is_err());
        assert!(Args::try_parse_from(["invoice_editor", "--date", "17.12.2021"]).is_err());
    }
}
