//! `till show` — full detail for one sale, open or closed.

use std::io::Write;
use std::path::Path;

use clap::Args;
use till_core::error::ErrorCode;
use till_core::receipt::{Receipt, format_money};

use crate::cmd::{load_project, load_register, open_store};
use crate::output::{
    CliError, OutputMode, pretty_kv, pretty_rule, pretty_section, render_error, render_mode,
};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Sale number, e.g. K7Q2M9X1. Case-insensitive.
    pub number: String,
}

/// Execute `till show`.
///
/// # Errors
///
/// Returns an error when the register is not initialized or when no sale
/// carries the given number.
pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let project = load_project(output, project_root)?;
    let register = load_register(output, &store)?;

    let Some(sale) = register.find(&args.number) else {
        let message = format!("no sale numbered '{}'", args.number);
        render_error(output, &CliError::from_coded(&message, ErrorCode::SaleNotFound))?;
        anyhow::bail!("{message}");
    };

    let receipt = Receipt::from_sale(sale);
    let symbol = project.register.currency;

    render_mode(
        output,
        &receipt,
        |receipt, w| render_show_text(receipt, &symbol, w),
        |receipt, w| render_show_pretty(receipt, &symbol, w),
    )
}

fn render_show_text(receipt: &Receipt, symbol: &str, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "sale {} {} {} items total {}",
        receipt.number,
        receipt.state,
        receipt.item_count,
        format_money(receipt.total, symbol)
    )?;
    for line in &receipt.items {
        writeln!(w, "{}", line.line(symbol))?;
    }
    Ok(())
}

fn render_show_pretty(receipt: &Receipt, symbol: &str, w: &mut dyn Write) -> std::io::Result<()> {
    let local = |t: chrono::DateTime<chrono::Utc>| {
        t.with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    };

    pretty_section(w, &format!("Sale {}", receipt.number))?;
    for line in &receipt.items {
        writeln!(w, "{}", line.line(symbol))?;
    }
    pretty_rule(w)?;
    pretty_kv(w, "State", receipt.state.as_str())?;
    pretty_kv(w, "Items", receipt.item_count.to_string())?;
    pretty_kv(w, "Opened", local(receipt.opened_at))?;
    if let Some(closed_at) = receipt.closed_at {
        pretty_kv(w, "Closed", local(closed_at))?;
    }
    pretty_kv(w, "Total", format_money(receipt.total, symbol))
}
