//! Error type of the CLI.

use std::io;

use thiserror::Error;

use corral::CorralError;

use crate::config::ConfigError;

/// Errors returned by [`run`](crate::run).
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid scenario {path}: {message}")]
    Scenario {
        path: String,
        source_code: String,
        message: String,
        span: Option<std::ops::Range<usize>>,
    },

    #[error("failed to set up node {node}")]
    Setup {
        node: String,
        #[source]
        source: CorralError,
    },

    #[error("step {step} ({action}) failed")]
    Step {
        step: usize,
        action: &'static str,
        #[source]
        source: CorralError,
    },
}

impl CliError {
    /// Builds a scenario error from a TOML parse failure.
    pub(crate) fn scenario(path: &str, source_code: &str, err: &toml::de::Error) -> Self {
        Self::Scenario {
            path: path.to_string(),
            source_code: source_code.to_string(),
            message: err.message().to_string(),
            span: err.span(),
        }
    }

    /// Returns the engine error behind a failed setup or step.
    pub fn engine_error(&self) -> Option<&CorralError> {
        match self {
            Self::Setup { source, .. } | Self::Step { source, .. } => Some(source),
            _ => None,
        }
    }
}
