//! `till total` — print the running total of the open sale.

use std::io::Write;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;
use till_core::receipt::format_money;

use crate::cmd::{load_project, load_register, open_store};
use crate::output::{OutputMode, render_mode};

#[derive(Debug, Serialize)]
struct TotalReport {
    total: Decimal,
    items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    sale: Option<String>,
}

/// Execute `till total`. Reports zero when no sale is open.
pub fn run_total(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let project = load_project(output, project_root)?;
    let register = load_register(output, &store)?;

    let report = TotalReport {
        total: register.current_total(),
        items: register.open_sale().map_or(0, |sale| sale.item_count()),
        sale: register.open_sale().map(|sale| sale.number.clone()),
    };
    let symbol = project.register.currency;

    render_mode(
        output,
        &report,
        // Bare amount so scripts can consume it directly.
        |report, w| writeln!(w, "{:.2}", report.total),
        |report, w| match report.sale {
            Some(ref number) => writeln!(
                w,
                "Running total: {} ({} items on sale {number})",
                format_money(report.total, &symbol),
                report.items
            ),
            None => writeln!(
                w,
                "Running total: {} (no open sale)",
                format_money(report.total, &symbol)
            ),
        },
    )
}
