//! `till void` — discard the open sale without a trace.
//!
//! Non-interactive, so no confirmation: scripts get exactly what they
//! asked for. The interactive register prompts before discarding.

use std::io::Write;
use std::path::Path;

use till_core::receipt::{Receipt, format_money};

use crate::cmd::{load_project, open_store};
use crate::output::{CliError, OutputMode, render_error, render_mode};

/// Execute `till void`.
///
/// # Errors
///
/// Returns an error when the register is not initialized, when no sale is
/// open, or when the register file cannot be updated.
pub fn run_void(output: OutputMode, quiet: bool, project_root: &Path) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let project = load_project(output, project_root)?;

    let outcome = match store.update(|register| {
        register
            .void_open()
            .map(|sale| Receipt::from_sale(&sale))
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

    if quiet {
        return Ok(());
    }
    let symbol = project.register.currency;

    render_mode(
        output,
        &receipt,
        |receipt, w| {
            writeln!(
                w,
                "voided {} {} items total {}",
                receipt.number,
                receipt.item_count,
                format_money(receipt.total, &symbol)
            )
        },
        |receipt, w| {
            writeln!(
                w,
                "Discarded sale {} ({} items, {} never charged).",
                receipt.number,
                receipt.item_count,
                format_money(receipt.total, &symbol)
            )
        },
    )
}
