//! `till status` — quick register orientation.
//!
//! Like `git status` for the till: shows the open sale with its rows and
//! running total, or reports that the register is idle. Designed to be
//! the first command after stepping back to the terminal.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use till_core::receipt::{Receipt, format_money};

use crate::cmd::{load_project, load_register, open_store};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};

/// Full status payload: the open sale (if any) plus history counts.
#[derive(Debug, Serialize)]
struct StatusReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    open: Option<Receipt>,
    closed_sales: usize,
}

/// Execute `till status`.
pub fn run_status(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let project = load_project(output, project_root)?;
    let register = load_register(output, &store)?;

    let report = StatusReport {
        open: register.open_sale().map(Receipt::from_sale),
        closed_sales: register.closed_sales().count(),
    };
    let symbol = project.register.currency;

    render_mode(
        output,
        &report,
        |report, w| render_status_text(report, &symbol, w),
        |report, w| render_status_pretty(report, &symbol, w),
    )
}

fn render_status_text(
    report: &StatusReport,
    symbol: &str,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    match report.open {
        Some(ref receipt) => {
            writeln!(
                w,
                "open {} {} items total {}",
                receipt.number,
                receipt.item_count,
                format_money(receipt.total, symbol)
            )?;
            for line in &receipt.items {
                writeln!(w, "{}", line.line(symbol))?;
            }
        }
        None => writeln!(w, "idle")?,
    }
    writeln!(w, "closed sales {}", report.closed_sales)
}

fn render_status_pretty(
    report: &StatusReport,
    symbol: &str,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    match report.open {
        Some(ref receipt) => {
            pretty_section(w, &format!("Sale {} (open)", receipt.number))?;
            for line in &receipt.items {
                writeln!(w, "{}", line.line(symbol))?;
            }
            pretty_rule(w)?;
            pretty_kv(w, "Items", receipt.item_count.to_string())?;
            pretty_kv(w, "Total", format_money(receipt.total, symbol))?;
        }
        None => {
            writeln!(w, "Register idle. Ring up an item with `till add`.")?;
        }
    }
    writeln!(w)?;
    writeln!(w, "Closed sales: {}", report.closed_sales)
}
