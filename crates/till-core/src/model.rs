use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a generated sale number.
pub const SALE_NUMBER_LEN: usize = 8;

const SALE_NUMBER_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// One product row on a sale: what was sold, at what unit price, how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name exactly as entered.
    pub name: String,
    /// Unit price, already normalized to two decimal places.
    pub unit_price: Decimal,
    /// Units sold, at least 1.
    pub quantity: u32,
}

impl LineItem {
    /// `unit_price × quantity` for this row.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The two lifecycle states of a sale. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleState {
    Open,
    Closed,
}

impl SaleState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SaleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single sale: opened on the first item, accumulates rows, sealed at
/// checkout.
///
/// Invariants (enforced by [`crate::register::Register`]):
/// - `closed_at` is `Some` exactly when `state` is [`SaleState::Closed`].
/// - a closed sale is never mutated again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// Short uppercase identifier shown on receipts, e.g. `K7Q2M9X1`.
    pub number: String,
    pub state: SaleState,
    pub items: Vec<LineItem>,
    pub opened_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Open a fresh sale with a generated number and no items.
    pub(crate) fn open(now: DateTime<Utc>) -> Self {
        Self {
            number: new_sale_number(),
            state: SaleState::Open,
            items: Vec::new(),
            opened_at: now,
            closed_at: None,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, SaleState::Open)
    }

    /// Sum of row subtotals. Zero for an empty sale.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Generate a sale number: [`SALE_NUMBER_LEN`] characters from `A-Z0-9`.
#[must_use]
pub fn new_sale_number() -> String {
    let mut rng = rand::thread_rng();
    (0..SALE_NUMBER_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SALE_NUMBER_CHARSET.len());
            char::from(SALE_NUMBER_CHARSET[idx])
        })
        .collect()
}
