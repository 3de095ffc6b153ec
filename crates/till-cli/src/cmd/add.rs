//! `till add` — ring up a product on the open sale.
//!
//! Opens a sale automatically when none is open, so `add` is always the
//! first command of a checkout flow.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use till_core::receipt::{ReceiptLine, format_money};
use till_core::validate::parse_line_item;

use crate::cmd::{load_project, open_store};
use crate::output::{CliError, OutputMode, render_error, render_mode};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Product name, up to 50 characters.
    pub name: String,

    /// Unit price, e.g. 3.50.
    pub price: String,

    /// Number of units, a whole number of 1 or more.
    pub quantity: String,
}

/// What `add` reports back: the row that was registered plus the running
/// state of the open sale.
#[derive(Debug, Serialize)]
struct AddReport {
    sale: String,
    item: ReceiptLine,
    items: usize,
    total: Decimal,
}

/// Execute `till add`.
///
/// # Errors
///
/// Returns an error when the register is not initialized, when any field
/// fails validation, or when the register file cannot be updated.
pub fn run_add(
    args: &AddArgs,
    output: OutputMode,
    quiet: bool,
    project_root: &Path,
) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let project = load_project(output, project_root)?;

    let item = match parse_line_item(&args.name, &args.price, &args.quantity) {
        Ok(item) => item,
        Err(e) => {
            tracing::warn!("rejected entry: {e}");
            render_error(output, &CliError::from_coded(&e, e.code()))?;
            anyhow::bail!("{e}");
        }
    };

    let line = ReceiptLine::from_item(&item);
    let sale = match store.update(|register| register.add_item(item, Utc::now()).clone()) {
        Ok(sale) => sale,
        Err(e) => {
            render_error(output, &CliError::from_coded(&e, e.code()))?;
            anyhow::bail!("{e}");
        }
    };

    if quiet {
        return Ok(());
    }

    let report = AddReport {
        sale: sale.number.clone(),
        item: line,
        items: sale.item_count(),
        total: sale.total(),
    };
    let symbol = project.register.currency;

    render_mode(
        output,
        &report,
        |report, w| {
            writeln!(
                w,
                "{}  {}  total {}",
                report.sale,
                report.item.line(&symbol),
                format_money(report.total, &symbol)
            )
        },
        |report, w| {
            writeln!(w, "✓ {}", report.item.line(&symbol))?;
            writeln!(
                w,
                "  Sale {}: {} items, total {}",
                report.sale,
                report.items,
                format_money(report.total, &symbol)
            )
        },
    )
}
