//! Entry-field validation.
//!
//! The register accepts three raw strings per row (name, price, quantity),
//! straight from a form or argv. [`parse_line_item`] turns them into a
//! [`LineItem`] or reports the first failed check.

use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::error::ErrorCode;
use crate::model::LineItem;

/// Maximum accepted product-name length, in characters.
pub const NAME_MAX_LEN: usize = 50;

/// The three entry fields, in the order blanks are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Price,
    Quantity,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Quantity => "quantity",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// One or more fields were empty or whitespace-only. `fields` lists
    /// every blank one, in name/price/quantity order.
    #[error("blank field(s): {}", list_fields(.fields))]
    EmptyField { fields: Vec<Field> },
    #[error("invalid price '{raw}': expected a positive amount like 3.50")]
    InvalidNumber { raw: String },
    #[error("invalid quantity '{raw}': expected a whole number of 1 or more")]
    InvalidQuantity { raw: String },
    #[error("product name is {len} characters, the maximum is {max}")]
    NameTooLong { len: usize, max: usize },
}

impl ValidateError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyField { .. } => ErrorCode::BlankField,
            Self::InvalidNumber { .. } => ErrorCode::InvalidPrice,
            Self::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            Self::NameTooLong { .. } => ErrorCode::NameTooLong,
        }
    }
}

fn list_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse the three raw entry fields into a [`LineItem`].
///
/// Checks run in a fixed order: blank fields (all reported together), then
/// name length, then price, then quantity. The name is kept exactly as
/// typed; only the blank check looks at a trimmed copy. The price is
/// normalized to two decimal places with banker's rounding.
///
/// # Errors
///
/// Returns the [`ValidateError`] for the first failed check.
pub fn parse_line_item(
    name: &str,
    price: &str,
    quantity: &str,
) -> Result<LineItem, ValidateError> {
    let mut blank = Vec::new();
    if name.trim().is_empty() {
        blank.push(Field::Name);
    }
    if price.trim().is_empty() {
        blank.push(Field::Price);
    }
    if quantity.trim().is_empty() {
        blank.push(Field::Quantity);
    }
    if !blank.is_empty() {
        return Err(ValidateError::EmptyField { fields: blank });
    }

    let len = name.chars().count();
    if len > NAME_MAX_LEN {
        return Err(ValidateError::NameTooLong {
            len,
            max: NAME_MAX_LEN,
        });
    }

    Ok(LineItem {
        name: name.to_string(),
        unit_price: parse_price(price)?,
        quantity: parse_quantity(quantity)?,
    })
}

/// Parse a price field: a strictly positive decimal, normalized to two
/// places.
///
/// # Errors
///
/// Returns [`ValidateError::InvalidNumber`] for anything that is not a
/// positive decimal amount.
pub fn parse_price(raw: &str) -> Result<Decimal, ValidateError> {
    let trimmed = raw.trim();
    match trimmed.parse::<Decimal>() {
        Ok(price) if price > Decimal::ZERO => {
            // round_dp never pads, so "3.5" would keep scale 1 and
            // serialize as "3.5". Rescale to exactly two places.
            let mut price = price.round_dp(2);
            price.rescale(2);
            Ok(price)
        }
        _ => Err(ValidateError::InvalidNumber {
            raw: trimmed.to_string(),
        }),
    }
}

/// Parse a quantity field: a whole number of at least 1.
///
/// # Errors
///
/// Returns [`ValidateError::InvalidQuantity`] for fractions, zero,
/// negatives, and non-numbers.
pub fn parse_quantity(raw: &str) -> Result<u32, ValidateError> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(quantity) if quantity >= 1 => Ok(quantity),
        _ => Err(ValidateError::InvalidQuantity {
            raw: trimmed.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_a_plain_row() {
        let item = parse_line_item("Apple", "1.99", "3").unwrap();
        assert_eq!(item.name, "Apple");
        assert_eq!(item.unit_price, dec!(1.99));
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn name_is_kept_exactly_as_typed() {
        let item = parse_line_item("  Green Tea ", "2.00", "1").unwrap();
        assert_eq!(item.name, "  Green Tea ");
    }

    #[test]
    fn price_and_quantity_tolerate_surrounding_whitespace() {
        let item = parse_line_item("Apple", " 1.99 ", " 3 ").unwrap();
        assert_eq!(item.unit_price, dec!(1.99));
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn reports_every_blank_field_in_order() {
        let err = parse_line_item("", "  ", "\t").unwrap_err();
        assert_eq!(
            err,
            ValidateError::EmptyField {
                fields: vec![Field::Name, Field::Price, Field::Quantity],
            }
        );
    }

    #[test]
    fn reports_a_single_blank_field() {
        let err = parse_line_item("Apple", "", "3").unwrap_err();
        assert_eq!(
            err,
            ValidateError::EmptyField {
                fields: vec![Field::Price],
            }
        );
    }

    #[test]
    fn blank_check_runs_before_number_checks() {
        // Price is blank and quantity is garbage; only the blank is reported.
        let err = parse_line_item("Apple", " ", "x").unwrap_err();
        assert!(matches!(err, ValidateError::EmptyField { .. }));
    }

    #[test]
    fn rejects_non_numeric_price() {
        let err = parse_line_item("Apple", "abc", "3").unwrap_err();
        assert_eq!(
            err,
            ValidateError::InvalidNumber {
                raw: "abc".to_string(),
            }
        );
    }

    #[test]
    fn rejects_zero_and_negative_prices() {
        assert!(matches!(
            parse_line_item("Apple", "0", "3"),
            Err(ValidateError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_line_item("Apple", "-1.99", "3"),
            Err(ValidateError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn normalizes_price_to_two_decimals_bankers() {
        assert_eq!(parse_price("3.505").unwrap(), dec!(3.50));
        assert_eq!(parse_price("3.515").unwrap(), dec!(3.52));
        assert_eq!(parse_price("1.005").unwrap(), dec!(1.00));
        assert_eq!(parse_price("2").unwrap(), dec!(2));
    }

    #[test]
    fn short_prices_are_padded_to_two_places() {
        assert_eq!(parse_price("0.1").unwrap().to_string(), "0.10");
        assert_eq!(parse_price("2").unwrap().to_string(), "2.00");
        assert_eq!(parse_price("3.50").unwrap().to_string(), "3.50");
    }

    #[test]
    fn rejects_fractional_zero_and_negative_quantities() {
        for raw in ["3.5", "0", "-2", "abc"] {
            assert!(matches!(
                parse_line_item("Apple", "1.99", raw),
                Err(ValidateError::InvalidQuantity { .. })
            ));
        }
    }

    #[test]
    fn rejects_names_over_the_cap() {
        let long = "x".repeat(NAME_MAX_LEN + 1);
        let err = parse_line_item(&long, "1.99", "1").unwrap_err();
        assert_eq!(
            err,
            ValidateError::NameTooLong {
                len: NAME_MAX_LEN + 1,
                max: NAME_MAX_LEN,
            }
        );
        // Exactly at the cap is fine.
        let ok = "x".repeat(NAME_MAX_LEN);
        assert!(parse_line_item(&ok, "1.99", "1").is_ok());
    }

    #[test]
    fn name_cap_counts_characters_not_bytes() {
        let name = "é".repeat(NAME_MAX_LEN);
        assert!(parse_line_item(&name, "1.99", "1").is_ok());
    }

    #[test]
    fn length_check_runs_before_price_check() {
        let long = "x".repeat(NAME_MAX_LEN + 1);
        let err = parse_line_item(&long, "bogus", "1").unwrap_err();
        assert!(matches!(err, ValidateError::NameTooLong { .. }));
    }

    #[test]
    fn error_messages_name_the_offending_value() {
        let err = parse_line_item("Apple", "abc", "3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid price 'abc': expected a positive amount like 3.50"
        );
        let err = parse_line_item("", "1.99", "3").unwrap_err();
        assert_eq!(err.to_string(), "blank field(s): name");
    }

    #[test]
    fn errors_map_to_stable_codes() {
        assert_eq!(
            parse_line_item("", "", "").unwrap_err().code().code(),
            "E2001"
        );
        assert_eq!(
            parse_line_item("A", "x", "1").unwrap_err().code().code(),
            "E2002"
        );
        assert_eq!(
            parse_line_item("A", "1", "x").unwrap_err().code().code(),
            "E2003"
        );
    }
}
