//! On-disk register store.
//!
//! Layout under the project root:
//!
//! ```text
//! .till/
//!   config.toml      project settings (currency symbol, checkout behavior)
//!   register.json    every sale, oldest first
//!   register.lock    advisory lock taken around writes
//!   .gitignore       (register.lock, *.tmp)
//! ```
//!
//! Writers replace `register.json` atomically: serialize to a sibling tmp
//! file, then rename over the real one. Readers therefore never observe a
//! torn file and may load without taking the lock. Mutating commands go
//! through [`RegisterStore::update`], which holds the exclusive lock across
//! the whole read-modify-write cycle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::error::ErrorCode;
use crate::lock::{LockError, StoreLock};
use crate::register::Register;

/// Name of the project-local store directory.
pub const TILL_DIR: &str = ".till";

const REGISTER_FILE: &str = "register.json";
const LOCK_FILE: &str = "register.lock";
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

const CONFIG_TOML: &str = "[register]\n\
    # Currency symbol shown before every amount.\n\
    currency = \"$\"\n\
    \n\
    [checkout]\n\
    # Ask for confirmation before finalizing a sale in the TUI.\n\
    confirm = true\n";

const GITIGNORE: &str = "register.lock\n*.tmp\n";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no till register found at {}", .path.display())]
    NotInitialized { path: PathBuf },
    #[error("till register already initialized at {}", .path.display())]
    AlreadyInitialized { path: PathBuf },
    #[error("failed to parse {}: {source}", .path.display())]
    RegisterParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("register I/O: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Machine-readable code associated with this store error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized { .. } => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::RegisterParse { .. } => ErrorCode::RegisterParseError,
            Self::Lock(err) => err.code(),
            Self::Io(_) => ErrorCode::RegisterWriteFailed,
        }
    }

    /// Optional remediation hint for operators and scripts.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

/// Handle on one project's `.till/` directory.
#[derive(Debug, Clone)]
pub struct RegisterStore {
    root: PathBuf,
}

impl RegisterStore {
    /// Create the `.till/` skeleton under `root`: an empty register, the
    /// default config template, and a `.gitignore` for the lock and tmp
    /// files. With `force`, an existing register is reset to empty; an
    /// existing config is left alone.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyInitialized`] when `.till/` exists and `force`
    /// is not set, or any filesystem failure.
    pub fn init(root: &Path, force: bool) -> Result<Self, StoreError> {
        let till_dir = root.join(TILL_DIR);
        if till_dir.exists() && !force {
            return Err(StoreError::AlreadyInitialized { path: till_dir });
        }
        fs::create_dir_all(&till_dir)?;

        let store = Self {
            root: root.to_path_buf(),
        };
        store.save(&Register::new())?;

        let config_path = till_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, CONFIG_TOML)?;
        }
        let gitignore_path = till_dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, GITIGNORE)?;
        }

        debug!(path = %till_dir.display(), "initialized register store");
        Ok(store)
    }

    /// Open an existing store.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotInitialized`] when `root` has no `.till/` directory.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let till_dir = root.join(TILL_DIR);
        if !till_dir.exists() {
            return Err(StoreError::NotInitialized { path: till_dir });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn till_dir(&self) -> PathBuf {
        self.root.join(TILL_DIR)
    }

    #[must_use]
    pub fn register_path(&self) -> PathBuf {
        self.till_dir().join(REGISTER_FILE)
    }

    fn lock_path(&self) -> PathBuf {
        self.till_dir().join(LOCK_FILE)
    }

    /// Read the register. A missing file is an empty register, so a
    /// half-initialized directory still opens.
    ///
    /// # Errors
    ///
    /// [`StoreError::RegisterParse`] for malformed JSON, or I/O failures.
    pub fn load(&self) -> Result<Register, StoreError> {
        let path = self.register_path();
        if !path.exists() {
            return Ok(Register::new());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|source| StoreError::RegisterParse { path, source })
    }

    /// Replace the register file under the store lock.
    ///
    /// # Errors
    ///
    /// Lock or filesystem failures.
    pub fn save(&self, register: &Register) -> Result<(), StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path(), LOCK_TIMEOUT)?;
        self.write_register(register)
    }

    /// One locked read-modify-write cycle: load the register, apply the
    /// closure, persist the result. Concurrent `till` processes serialize
    /// on the store lock, so no cycle observes a half-applied peer.
    ///
    /// # Errors
    ///
    /// Lock, parse, or filesystem failures. The closure's own outcome is
    /// returned verbatim inside `Ok`.
    pub fn update<T>(&self, apply: impl FnOnce(&mut Register) -> T) -> Result<T, StoreError> {
        let _lock = StoreLock::acquire(&self.lock_path(), LOCK_TIMEOUT)?;
        let mut register = self.load()?;
        let out = apply(&mut register);
        self.write_register(&register)?;
        Ok(out)
    }

    fn write_register(&self, register: &Register) -> Result<(), StoreError> {
        let path = self.register_path();
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(register).map_err(io::Error::from)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), sales = register.len(), "wrote register");
        Ok(())
    }
}
