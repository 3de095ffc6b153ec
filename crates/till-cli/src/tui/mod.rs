//! Terminal user interface (TUI) for till.
//!
//! Provides the full-screen register: ring up items, check out, void.
//!
//! ## Entry points
//!
//! - [`register::run`] — interactive register with entry fields and dialogs.

pub mod dialog;
pub mod register;
