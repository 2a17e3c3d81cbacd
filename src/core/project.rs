//! Project discovery and structure

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::core::store::DATABASE_FILE;

/// Name of the directory that marks a project root
pub const PROJECT_DIR: &str = ".relief";

/// Represents a ledger project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .relief/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir()?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start.canonicalize()?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create the project directory and a commented default config.
    ///
    /// With `force`, an existing project has its config rewritten; the
    /// ledger database is left untouched.
    pub fn init(path: &Path, force: bool) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let dir = root.join(PROJECT_DIR);
        if dir.exists() && !force {
            return Err(ProjectError::AlreadyExists(root));
        }

        std::fs::create_dir_all(&dir)?;
        std::fs::write(dir.join("config.yaml"), Self::default_config())?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Relief Ledger project configuration

# Database file, relative to the project root
# database: .relief/ledger.db

# Log filter directive (e.g. "relief=debug"); RELIEF_LOG overrides it
# log: warn

# Status given to new donations when none is specified
# default_status: pending
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .relief directory
    pub fn relief_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.relief_dir().join("config.yaml")
    }

    /// Default database location
    pub fn database_path(&self) -> PathBuf {
        self.relief_dir().join(DATABASE_FILE)
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error, Diagnostic)]
pub enum ProjectError {
    #[error("not a relief project (searched from {searched_from:?})")]
    #[diagnostic(
        code(relief::project::not_found),
        help("run `relief init` to create one")
    )]
    NotFound { searched_from: PathBuf },

    #[error("relief project already exists at {0:?}")]
    #[diagnostic(code(relief::project::exists), help("use --force to rewrite its config"))]
    AlreadyExists(PathBuf),

    #[error("I/O error: {0}")]
    #[diagnostic(code(relief::io))]
    Io(#[from] std::io::Error),
}
