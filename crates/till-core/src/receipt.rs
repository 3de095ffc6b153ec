//! Receipt formatting: display rules for money and sale rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{LineItem, Sale, SaleState};

/// Format an amount with the currency symbol and exactly two decimals.
#[must_use]
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    format!("{symbol}{amount:.2}")
}

fn row(name: &str, unit_price: Decimal, quantity: u32, symbol: &str) -> String {
    format!("{name} - {} x {quantity}", format_money(unit_price, symbol))
}

/// One display row: `<name> - <symbol><price> x <quantity>`.
#[must_use]
pub fn item_line(item: &LineItem, symbol: &str) -> String {
    row(&item.name, item.unit_price, item.quantity, symbol)
}

/// A self-contained snapshot of one sale, for display and JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub number: String,
    pub state: SaleState,
    pub opened_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    pub items: Vec<ReceiptLine>,
    pub item_count: usize,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptLine {
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

impl Receipt {
    #[must_use]
    pub fn from_sale(sale: &Sale) -> Self {
        Self {
            number: sale.number.clone(),
            state: sale.state,
            opened_at: sale.opened_at,
            closed_at: sale.closed_at,
            items: sale.items.iter().map(ReceiptLine::from_item).collect(),
            item_count: sale.item_count(),
            total: sale.total(),
        }
    }
}

impl ReceiptLine {
    #[must_use]
    pub fn from_item(item: &LineItem) -> Self {
        Self {
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            subtotal: item.subtotal(),
        }
    }

    /// Display row for this line, same shape as [`item_line`].
    #[must_use]
    pub fn line(&self, symbol: &str) -> String {
        row(&self.name, self.unit_price, self.quantity, symbol)
    }
}
