//! Shapeboard application shell.
//!
//! Drives a [`shapeboard_core::Canvas`] from a JSON session script instead of a
//! window: every entry in the script is one user action (a drop, a pointer
//! event, a context-menu command). Rejected actions are collected as warnings,
//! the way the UI would show a toast.

mod renderer;
mod script;

pub use renderer::LogRenderer;
pub use script::{Command, Session};

use shapeboard_core::{CanvasConfig, ConfigError, SceneError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid session script: {0}")]
    Script(#[source] serde_json::Error),
    #[error("Failed to serialize document: {0}")]
    Output(#[source] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

pub(crate) fn read_file(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_bytes(path: &Path) -> AppResult<Vec<u8>> {
    fs::read(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a canvas configuration file.
pub fn load_config(path: &Path) -> AppResult<CanvasConfig> {
    let json = read_file(path)?;
    Ok(CanvasConfig::from_json(&json)?)
}

/// Load a session script: a JSON array of [`Command`]s.
pub fn load_script(path: &Path) -> AppResult<Vec<Command>> {
    let json = read_file(path)?;
    serde_json::from_str(&json).map_err(AppError::Script)
}

/// Replay the script at `script` on a fresh canvas. Relative scene and image
/// paths in the script resolve against the script's directory.
pub fn run_script_file(script: &Path, config: CanvasConfig) -> AppResult<Session> {
    let commands = load_script(script)?;
    let base_dir = script.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut session = Session::new(config).with_base_dir(base_dir);
    session.run(&commands)?;
    Ok(session)
}
