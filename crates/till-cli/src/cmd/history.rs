//! `till history` — list closed sales, oldest first.

use std::io::{self, Write};
use std::path::Path;

use till_core::receipt::{Receipt, format_money};

use crate::cmd::{load_project, load_register, open_store};
use crate::output::{OutputMode, Renderable, render_list};

/// One sale in the history listing.
struct HistoryRow<'a> {
    receipt: Receipt,
    symbol: &'a str,
}

impl Renderable for HistoryRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let closed = self
            .receipt
            .closed_at
            .map_or_else(String::new, |t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            });
        writeln!(
            w,
            "{}  {}  {} items  {}",
            self.receipt.number,
            closed,
            self.receipt.item_count,
            format_money(self.receipt.total, self.symbol)
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let val = serde_json::to_string(&self.receipt).map_err(io::Error::other)?;
        write!(w, "{val}")
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let closed = self
            .receipt
            .closed_at
            .map_or_else(String::new, |t| t.to_rfc3339());
        writeln!(
            w,
            "{}\t{}\t{}\t{:.2}",
            self.receipt.number, closed, self.receipt.item_count, self.receipt.total
        )
    }

    fn table_headers() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &["NUMBER", "CLOSED_AT", "ITEMS", "TOTAL"]
    }
}

/// Execute `till history`.
pub fn run_history(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let project = load_project(output, project_root)?;
    let register = load_register(output, &store)?;
    let symbol = project.register.currency;

    let rows: Vec<HistoryRow> = register
        .closed_sales()
        .map(|sale| HistoryRow {
            receipt: Receipt::from_sale(sale),
            symbol: &symbol,
        })
        .collect();

    if output.is_pretty() && rows.is_empty() {
        println!("No closed sales yet.");
        return Ok(());
    }

    render_list(&rows, output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use till_core::model::LineItem;
    use till_core::register::Register;

    fn closed_row(symbol: &str) -> HistoryRow<'_> {
        let mut register = Register::new();
        register.add_item(
            LineItem {
                name: "Milk".to_string(),
                unit_price: dec!(3.50),
                quantity: 2,
            },
            Utc::now(),
        );
        let sale = register.finalize(Utc::now()).expect("finalize").clone();
        HistoryRow {
            receipt: Receipt::from_sale(&sale),
            symbol,
        }
    }

    #[test]
    fn human_row_shows_count_and_money() {
        let row = closed_row("$");
        let mut out = Vec::new();
        row.render_human(&mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");

        assert!(rendered.contains(&row.receipt.number));
        assert!(rendered.contains("1 items"));
        assert!(rendered.contains("$7.00"));
    }

    #[test]
    fn table_row_is_tab_separated() {
        let row = closed_row("$");
        let mut out = Vec::new();
        row.render_table(&mut out).expect("render");
        let rendered = String::from_utf8(out).expect("utf8");

        let fields: Vec<&str> = rendered.trim_end().split('\t').collect();
        assert_eq!(fields.len(), HistoryRow::table_headers().len());
        assert_eq!(fields[0], row.receipt.number);
        assert_eq!(fields[2], "1");
        assert_eq!(fields[3], "7.00");
    }

    #[test]
    fn json_row_carries_the_receipt_fields() {
        let row = closed_row("$");
        let mut out = Vec::new();
        row.render_json(&mut out).expect("render");
        let value: serde_json::Value =
            serde_json::from_slice(&out).expect("row must be valid JSON");

        assert_eq!(value["state"], "closed");
        assert_eq!(value["total"], "7.00");
        assert!(value["closed_at"].is_string());
    }
}
