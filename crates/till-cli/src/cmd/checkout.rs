//! `till checkout` — close the open sale and print the receipt.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use till_core::receipt::{Receipt, format_money};

use crate::cmd::{load_project, open_store};
use crate::output::{
    CliError, OutputMode, pretty_kv, pretty_rule, pretty_section, render_error, render_mode,
};

/// Execute `till checkout`.
///
/// Seals the open sale and reports the final receipt. The sale must have
/// at least one item; an idle register is an error.
///
/// # Errors
///
/// Returns an error when the register is not initialized, when there is
/// no open sale with items, or when the register file cannot be updated.
pub fn run_checkout(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let project = load_project(output, project_root)?;

    let outcome = match store.update(|register| {
        register.finalize(Utc::now()).map(Receipt::from_sale)
    }) {
        Ok(outcome) => outcome,
        Err(e) => {
            render_error(output, &CliError::from_coded(&e, e.code()))?;
            anyhow::bail!("{e}");
        }
    };

    let receipt = match outcome {
        Ok(receipt) => receipt,
        Err(e) => {
            render_error(output, &CliError::from_coded(&e, e.code()))?;
            anyhow::bail!("{e}");
        }
    };
    let symbol = project.register.currency;

    render_mode(
        output,
        &receipt,
        |receipt, w| render_checkout_text(receipt, &symbol, w),
        |receipt, w| render_checkout_pretty(receipt, &symbol, w),
    )
}

fn render_checkout_text(receipt: &Receipt, symbol: &str, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "closed {} {} items total {}",
        receipt.number,
        receipt.item_count,
        format_money(receipt.total, symbol)
    )?;
    for line in &receipt.items {
        writeln!(w, "{}", line.line(symbol))?;
    }
    Ok(())
}

fn render_checkout_pretty(
    receipt: &Receipt,
    symbol: &str,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    pretty_section(w, &format!("Receipt {}", receipt.number))?;
    for line in &receipt.items {
        writeln!(w, "{}", line.line(symbol))?;
    }
    pretty_rule(w)?;
    pretty_kv(w, "Items", receipt.item_count.to_string())?;
    if let Some(closed_at) = receipt.closed_at {
        pretty_kv(
            w,
            "Closed",
            closed_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        )?;
    }
    writeln!(w)?;
    writeln!(w, "Total purchase: {}", format_money(receipt.total, symbol))
}
