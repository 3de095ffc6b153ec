use std::fmt;

/// Machine-readable error codes for scripting-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    AlreadyInitialized,
    BlankField,
    InvalidPrice,
    InvalidQuantity,
    NameTooLong,
    NothingToFinalize,
    NothingToVoid,
    SaleNotFound,
    RegisterParseError,
    RegisterWriteFailed,
    LockContention,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::AlreadyInitialized => "E1003",
            Self::BlankField => "E2001",
            Self::InvalidPrice => "E2002",
            Self::InvalidQuantity => "E2003",
            Self::NameTooLong => "E2004",
            Self::NothingToFinalize => "E2005",
            Self::NothingToVoid => "E2006",
            Self::SaleNotFound => "E2007",
            Self::RegisterParseError => "E3001",
            Self::RegisterWriteFailed => "E5001",
            Self::LockContention => "E5002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Register not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::AlreadyInitialized => "Register already initialized",
            Self::BlankField => "Required field left blank",
            Self::InvalidPrice => "Invalid price",
            Self::InvalidQuantity => "Invalid quantity",
            Self::NameTooLong => "Product name too long",
            Self::NothingToFinalize => "Nothing to finalize",
            Self::NothingToVoid => "Nothing to void",
            Self::SaleNotFound => "Sale not found",
            Self::RegisterParseError => "Register file parse error",
            Self::RegisterWriteFailed => "Register file write failed",
            Self::LockContention => "Lock contention",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and scripts.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `till init` to set up a register here."),
            Self::ConfigParseError => Some("Fix syntax in .till/config.toml and retry."),
            Self::AlreadyInitialized => Some("Pass --force to start over with an empty register."),
            Self::BlankField => Some("Provide a product name, a price, and a quantity."),
            Self::InvalidPrice => Some("Use a positive amount like 3.50."),
            Self::InvalidQuantity => Some("Use a whole number of 1 or more."),
            Self::NameTooLong => Some("Shorten the product name to 50 characters or fewer."),
            Self::NothingToFinalize => Some("Add at least one product before checkout."),
            Self::NothingToVoid => None,
            Self::SaleNotFound => Some("Run `till history` to list sale numbers."),
            Self::RegisterParseError => {
                Some("Restore .till/register.json from backup or re-run `till init --force`.")
            }
            Self::RegisterWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `till` process releases its lock."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotInitialized,
            ErrorCode::ConfigParseError,
            ErrorCode::AlreadyInitialized,
            ErrorCode::BlankField,
            ErrorCode::InvalidPrice,
            ErrorCode::InvalidQuantity,
            ErrorCode::NameTooLong,
            ErrorCode::NothingToFinalize,
            ErrorCode::NothingToVoid,
            ErrorCode::SaleNotFound,
            ErrorCode::RegisterParseError,
            ErrorCode::RegisterWriteFailed,
            ErrorCode::LockContention,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::NothingToFinalize.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
