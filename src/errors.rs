//! Fatal error types. Anything here aborts the run with a non-zero exit.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An external tool is missing or exited unsuccessfully
    #[error("Tool chain error ({tool}): {message}")]
    Toolchain { tool: String, message: String },

    /// A tool ran but did not produce what it should have
    #[error("Expected artifact {} was not produced", path.display())]
    MissingArtifact { path: PathBuf },

    /// The combined XML description could not be parsed
    #[error("XML error in {}: {message}", path.display())]
    Xml { path: PathBuf, message: String },

    /// The root module of a module-mode run could not be located
    #[error("Module '{module}' not found in search path {searched:?}")]
    ModuleNotFound {
        module: String,
        searched: Vec<PathBuf>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The palette could not be written
    #[error("Failed to write palette {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn toolchain(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Toolchain {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn missing_artifact(path: impl Into<PathBuf>) -> Self {
        Self::MissingArtifact { path: path.into() }
    }

    pub fn xml(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Xml {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
