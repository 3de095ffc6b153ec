//! Subcommand implementations for the `till` binary.
//!
//! Each submodule owns one subcommand: its clap `Args` struct (when it
//! takes any) and a `run_*` entry point called from `main`.

use std::path::Path;

use till_core::config::{self, ProjectConfig};
use till_core::error::ErrorCode;
use till_core::register::Register;
use till_core::store::RegisterStore;

use crate::output::{CliError, OutputMode, render_error};

pub mod add;
pub mod checkout;
pub mod completions;
pub mod history;
pub mod init;
pub mod show;
pub mod status;
pub mod total;
pub mod ui;
pub mod void;

/// Open the register store, reporting a structured error when the
/// directory was never initialized.
pub(crate) fn open_store(output: OutputMode, project_root: &Path) -> anyhow::Result<RegisterStore> {
    match RegisterStore::open(project_root) {
        Ok(store) => Ok(store),
        Err(e) => {
            render_error(output, &CliError::from_coded(&e, e.code()))?;
            anyhow::bail!("{e}");
        }
    }
}

/// Load the register, reporting a structured error when the file cannot
/// be read or parsed.
pub(crate) fn load_register(output: OutputMode, store: &RegisterStore) -> anyhow::Result<Register> {
    match store.load() {
        Ok(register) => Ok(register),
        Err(e) => {
            render_error(output, &CliError::from_coded(&e, e.code()))?;
            anyhow::bail!("{e}");
        }
    }
}

/// Load the project config, reporting a structured error when
/// `.till/config.toml` exists but cannot be read or parsed.
pub(crate) fn load_project(
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<ProjectConfig> {
    match config::load_project_config(project_root) {
        Ok(project) => Ok(project),
        Err(e) => {
            render_error(output, &CliError::from_coded(&e, ErrorCode::ConfigParseError))?;
            anyhow::bail!("{e}");
        }
    }
}
