//! `till init` — create the register skeleton in the project directory.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;
use till_core::store::RegisterStore;

use crate::output::{CliError, OutputMode, render_error, render_mode};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.till/` already exists.
    ///
    /// Resets the register to empty; an existing config.toml is kept.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitReport {
    register: String,
    config: String,
}

/// Execute `till init`. Creates the project skeleton:
///
/// ```text
/// .till/
///   register.json    (empty register)
///   config.toml      (default project config template)
///   .gitignore       (register.lock, *.tmp)
/// ```
///
/// # Errors
///
/// Returns an error if `.till/` already exists and `--force` is not set,
/// or if any filesystem operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let store = match RegisterStore::init(project_root, args.force) {
        Ok(store) => store,
        Err(e) => {
            render_error(output, &CliError::from_coded(&e, e.code()))?;
            anyhow::bail!("{e}");
        }
    };

    let report = InitReport {
        register: store.register_path().display().to_string(),
        config: store.till_dir().join("config.toml").display().to_string(),
    };

    render_mode(
        output,
        &report,
        |report, w| writeln!(w, "initialized {}", report.register),
        |report, w| {
            writeln!(w, "✓ Initialized .till/ register.")?;
            writeln!(w)?;
            writeln!(w, "  Register: {}", report.register)?;
            writeln!(w, "  Config:   {}", report.config)?;
            writeln!(w)?;
            writeln!(w, "Next steps:")?;
            writeln!(w, "  Ring up your first item:")?;
            writeln!(w, "    till add \"Milk\" 3.50 2")?;
            writeln!(w)?;
            writeln!(w, "  Or run the interactive register:")?;
            writeln!(w, "    till ui")?;
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::{fs, path::PathBuf};

    fn make_temp_dir(label: &str) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("till-init-test-{label}-{id}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn fresh_init_creates_structure() {
        let root = make_temp_dir("fresh");
        let args = InitArgs { force: false };
        run_init(&args, OutputMode::Json, &root).expect("init should succeed");

        assert!(root.join(".till").is_dir());
        assert!(root.join(".till/register.json").is_file());
        assert!(root.join(".till/config.toml").is_file());
        assert!(root.join(".till/.gitignore").is_file());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn reinit_without_force_fails() {
        let root = make_temp_dir("no-force");
        let args = InitArgs { force: false };
        run_init(&args, OutputMode::Json, &root).expect("first init should succeed");

        let result = run_init(&args, OutputMode::Json, &root);
        assert!(result.is_err(), "reinit without --force must fail");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn reinit_with_force_succeeds() {
        let root = make_temp_dir("with-force");
        run_init(&InitArgs { force: false }, OutputMode::Json, &root)
            .expect("first init should succeed");
        run_init(&InitArgs { force: true }, OutputMode::Json, &root)
            .expect("reinit --force should succeed");

        assert!(root.join(".till/register.json").is_file());
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn gitignore_covers_transient_files() {
        let root = make_temp_dir("gitignore");
        run_init(&InitArgs { force: false }, OutputMode::Json, &root)
            .expect("init should succeed");

        let content =
            fs::read_to_string(root.join(".till/.gitignore")).expect(".gitignore readable");
        assert!(
            content.contains("register.lock"),
            "must ignore register.lock"
        );
        assert!(content.contains("*.tmp"), "must ignore tmp files");

        let _ = fs::remove_dir_all(&root);
    }
}
