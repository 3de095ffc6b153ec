//! `till ui` — the interactive full-screen register.

use std::path::Path;

use crate::cmd::{load_project, open_store};
use crate::output::OutputMode;
use crate::tui;

/// Execute `till ui`.
///
/// # Errors
///
/// Returns an error when the register is not initialized or when the
/// terminal session fails.
pub fn run_ui(output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = open_store(output, project_root)?;
    let project = load_project(output, project_root)?;
    tui::register::run(store, &project)
}
