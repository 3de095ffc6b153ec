//! The register: an ordered history of sales, at most one of them open.
//!
//! Sales are append-only. A sale is opened lazily by the first
//! [`Register::add_item`] call, accumulates rows, and is sealed in place by
//! [`Register::finalize`] or discarded by [`Register::void_open`]. Once
//! closed, a sale is never touched again.
//!
//! ## Invariants
//!
//! - At most one sale is open at any time, and it is always the last entry.
//! - Closed sales form a prefix of the history, in the order they closed.
//! - A closed sale has `closed_at` set and at least one item.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::ErrorCode;
use crate::model::{LineItem, Sale, SaleState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// Checkout with no open sale, or an open sale with zero items.
    #[error("no open sale with items to finalize")]
    NothingToFinalize,
    /// Void with no open sale.
    #[error("no open sale to void")]
    NothingToVoid,
}

impl RegisterError {
    #[must_use]
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::NothingToFinalize => ErrorCode::NothingToFinalize,
            Self::NothingToVoid => ErrorCode::NothingToVoid,
        }
    }
}

/// The whole state of one till: every sale ever rung up, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    sales: Vec<Sale>,
}

impl Register {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The open sale, if one exists. It is always the last entry.
    #[must_use]
    pub fn open_sale(&self) -> Option<&Sale> {
        self.sales.last().filter(|sale| sale.is_open())
    }

    fn open_sale_mut(&mut self) -> Option<&mut Sale> {
        self.sales.last_mut().filter(|sale| sale.is_open())
    }

    /// Append an item to the open sale, opening a fresh sale first when
    /// none is open. Returns the open sale for display.
    pub fn add_item(&mut self, item: LineItem, now: DateTime<Utc>) -> &Sale {
        if self.open_sale().is_none() {
            let sale = Sale::open(now);
            info!(number = %sale.number, "opened sale");
            self.sales.push(sale);
        }
        // The push above guarantees an open last sale.
        let idx = self.sales.len() - 1;
        let sale = &mut self.sales[idx];
        debug!(
            number = %sale.number,
            name = %item.name,
            quantity = item.quantity,
            "added item"
        );
        sale.items.push(item);
        &self.sales[idx]
    }

    /// Running total of the open sale. Zero when no sale is open.
    #[must_use]
    pub fn current_total(&self) -> Decimal {
        self.open_sale().map_or(Decimal::ZERO, Sale::total)
    }

    /// Seal the open sale: state becomes `Closed`, `closed_at` is stamped,
    /// and the sale stays in place at the end of the history. After this
    /// no sale is open.
    ///
    /// # Errors
    ///
    /// [`RegisterError::NothingToFinalize`] when no sale is open or the
    /// open sale has no items (possible only in a hand-edited store file).
    pub fn finalize(&mut self, now: DateTime<Utc>) -> Result<&Sale, RegisterError> {
        let Some(sale) = self.open_sale_mut() else {
            return Err(RegisterError::NothingToFinalize);
        };
        if sale.items.is_empty() {
            return Err(RegisterError::NothingToFinalize);
        }
        sale.state = SaleState::Closed;
        sale.closed_at = Some(now);
        info!(
            number = %sale.number,
            items = sale.item_count(),
            total = %sale.total(),
            "closed sale"
        );
        Ok(&self.sales[self.sales.len() - 1])
    }

    /// Discard the open sale entirely and return it for reporting. The
    /// history keeps no trace of it.
    ///
    /// # Errors
    ///
    /// [`RegisterError::NothingToVoid`] when no sale is open.
    pub fn void_open(&mut self) -> Result<Sale, RegisterError> {
        if self.open_sale().is_none() {
            return Err(RegisterError::NothingToVoid);
        }
        // Checked open above, and the open sale is always last.
        let sale = self.sales.pop().ok_or(RegisterError::NothingToVoid)?;
        info!(number = %sale.number, items = sale.item_count(), "voided sale");
        Ok(sale)
    }

    /// Every sale, oldest first, open sale last if present.
    #[must_use]
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    /// Closed sales only, oldest first.
    pub fn closed_sales(&self) -> impl Iterator<Item = &Sale> {
        self.sales.iter().filter(|sale| !sale.is_open())
    }

    /// Look up a sale by number, ignoring case. Numbers are generated
    /// uppercase; exact match only.
    #[must_use]
    pub fn find(&self, number: &str) -> Option<&Sale> {
        self.sales
            .iter()
            .find(|sale| sale.number.eq_ignore_ascii_case(number))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sales.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}
