use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::billing;
use crate::errors::EditError;
use crate::format::{format_currency, format_date};
use crate::models::{Invoice, LineItem};

/// Writes printable Markdown renditions of an invoice
pub struct InvoiceExporter {
    output_dir: PathBuf,
}

impl InvoiceExporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let path = output_dir.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        Ok(Self {
            output_dir: path.to_path_buf(),
        })
    }

    /// Write `invoice_<number>.md` and return its path
    pub fn export(&self, invoice: &Invoice, items: &[LineItem]) -> Result<PathBuf> {
        let markdown = render_markdown(invoice, items)?;
        let path = self.output_dir.join(file_name(&invoice.number));

        let mut file = File::create(&path)?;
        file.write_all(markdown.as_bytes())?;

        info!(path = %path.display(), items = items.len(), "invoice exported");
        Ok(path)
    }
}

fn file_name(number: &str) -> String {
    let safe: String = number
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("invoice_{}.md", safe)
}

/// Render the invoice the way it is printed
pub fn render_markdown(invoice: &Invoice, items: &[LineItem]) -> Result<String, EditError> {
    let mut content = String::new();

    content.push_str(&format!("Date: {}  \n", format_date(invoice.date)));
    content.push_str(&format!("Invoice no.: {}\n\n", invoice.number));
    content.push_str("# Invoice\n\n");

    if invoice.show_hours {
        content.push_str("| Pos. | Qty | Unit | Description | Unit price | Total price |\n");
        content.push_str("|---:|---:|:---:|:---|---:|---:|\n");
    } else {
        content.push_str("| Pos. | Unit | Description | Unit price | Total price |\n");
        content.push_str("|---:|:---:|:---|---:|---:|\n");
    }

    for (index, item) in items.iter().enumerate() {
        let amount = billing::line_total(item, invoice.show_hours)?;
        let mut row = format!("| {} ", item.display_position(index));
        if invoice.show_hours {
            row.push_str(&format!("| {} ", item.quantity));
        }
        row.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&item.unit),
            escape_cell(&item.description),
            format_currency(item.unit_price),
            format_currency(amount)
        ));
        content.push_str(&row);
    }

    if !items.is_empty() {
        content.push('\n');
        content.push_str(&format!("Subtotal: {}  \n", format_currency(invoice.subtotal)));
        if invoice.apply_tax {
            content.push_str(&format!(
                "VAT {}% on the net amount: {}  \n",
                billing::tax_percent(),
                format_currency(invoice.tax_amount)
            ));
        }
        content.push_str(&format!("**Total: {}**\n", format_currency(invoice.total())));
    }

    content.push('\n');
    if !invoice.apply_tax {
        content.push_str("The recipient of the service owes the VAT under § 13b UStG.\n\n");
    }
    content.push_str(&format!(
        "The invoice amount ({}) is due by {}.\n",
        format_currency(invoice.total()),
        format_date(invoice.date)
    ));

    Ok(content)
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
