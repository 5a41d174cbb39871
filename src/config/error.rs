//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Only [`ConfigError::FileWrite`] is fatal; read and parse failures are
/// logged and the built-in defaults are used instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    ///
    /// Carries only the position and the parser message; the offending
    /// source line may hold a credential and is never included.
    #[error("Failed to parse TOML config at line {line}, column {column}: {message}")]
    TomlParse {
        /// 1-based line of the error
        line: usize,
        /// 1-based column of the error
        column: usize,
        /// Parser message without the source excerpt
        message: String,
    },

    /// Failed to write the configuration file.
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Converts a TOML parse error, locating it in `content`.
    #[must_use]
    pub fn toml_parse(error: &toml::de::Error, content: &str) -> Self {
        let offset = error.span().map_or(0, |span| span.start);
        let before = content.get(..offset).unwrap_or(content);
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map_or(0, |tail| tail.chars().count())
            + 1;

        Self::TomlParse {
            line,
            column,
            message: error.message().trim().to_string(),
        }
    }

    /// Returns true if the file does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FileRead { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
