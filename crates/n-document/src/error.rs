//! Error types for document dumps.

use thiserror::Error;

/// Everything that can stop a dump.
#[derive(Debug, Error)]
pub enum DumpError {
    /// Writing to the destination failed. The destination may hold a
    /// truncated document.
    #[error("write failed: {0}")]
    Write(#[from] n_term::Error),

    /// An option has a value the dump can't use.
    #[error("invalid value {value:?} for option {name}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// The offending value, as given.
        value: String,
    },

    /// An option assignment names an option that doesn't exist.
    #[error("unknown option: {0}")]
    UnknownOption(String),
}

/// Result alias for dump operations.
pub type Result<T> = std::result::Result<T, DumpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_error_wraps_output_error() {
        let err: DumpError = n_term::Error::Poisoned.into();
        assert!(matches!(err, DumpError::Write(n_term::Error::Poisoned)));
        assert!(err.to_string().starts_with("write failed:"));
    }

    #[test]
    fn invalid_option_message() {
        let err = DumpError::InvalidOption {
            name: "document.dump.width".to_string(),
            value: "-3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"-3\" for option document.dump.width"
        );
    }
}
