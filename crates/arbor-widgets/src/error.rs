#![forbid(unsafe_code)]

//! Configuration errors.
//!
//! Only configuration is fallible. Navigation, rendering, and ticking never
//! fail: empty or fully filtered input degrades to a placeholder row.

/// Largest accepted indent width per depth level.
pub const MAX_INDENT_SIZE: usize = 16;

/// Errors raised while building or loading a widget configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicit page size of zero.
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// Indent width outside `1..=MAX_INDENT_SIZE`.
    #[error("indent size must be between 1 and {max}, got {got}")]
    InvalidIndentSize {
        /// Rejected value.
        got: usize,
        /// Upper bound.
        max: usize,
    },

    /// A viewport height of zero.
    #[error("viewport height must be at least 1")]
    InvalidViewport,

    /// Both `expand_all` and `collapse_all` were requested.
    #[error("expand_all and collapse_all are mutually exclusive")]
    ConflictingExpansion,

    /// A TOML or JSON document could not be parsed.
    #[error("failed to parse {format} input: {message}")]
    Parse {
        /// `"toml"` or `"json"`.
        format: &'static str,
        /// Parser diagnostic.
        message: String,
    },

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "config-file")]
impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse {
            format: "toml",
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "config-file")]
impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            format: "json",
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = ConfigError::InvalidIndentSize { got: 20, max: 16 };
        assert_eq!(
            err.to_string(),
            "indent size must be between 1 and 16, got 20"
        );
        assert!(
            ConfigError::ConflictingExpansion
                .to_string()
                .contains("mutually exclusive")
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn parser_errors_convert() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Parse { format: "json", .. }));
    }
}
