//! Error handling for lotto-forge


use thiserror::Error;

/// Main error type for lotto-forge
#[derive(Error, Debug, Clone)]
pub enum LottoForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("No combination satisfied {predicates} predicate(s) within {attempts} attempts")]
    Unsatisfiable { attempts: u64, predicates: usize },

    #[error("Random source error: {message}")]
    Random { message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("CLI error: {message}")]
    Cli { message: String },
}

impl LottoForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an unsatisfiable-constraints error
    pub fn unsatisfiable(attempts: u64, predicates: usize) -> Self {
        Self::Unsatisfiable {
            attempts,
            predicates,
        }
    }

    /// Create a random source error
    pub fn random(message: impl Into<String>) -> Self {
        Self::Random {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a CLI error
    pub fn cli(message: impl Into<String>) -> Self {
        Self::Cli {
            message: message.into(),
        }
    }

    /// Whether the failure came from talking to the draw history site
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or LOTTO_* variables", message)
            }
            Self::Validation { message } => {
                format!("❌ Validation error: {}\n💡 Check your input format", message)
            }
            Self::Unsatisfiable { attempts, predicates } => {
                format!(
                    "❌ Gave up after {} attempts: the {} active predicate(s) may contradict each other\n💡 Try a smaller --only list or raise --max-attempts",
                    attempts, predicates
                )
            }
            Self::Random { message } => {
                format!("❌ Random source failed: {}\n💡 The operating system entropy source is unavailable", message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Timeout { operation, timeout_secs } => {
                format!("⏱️  Operation '{}' timed out after {}s\n💡 Try raising LOTTO_TIMEOUT_SECS", operation, timeout_secs)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 The lottery site may have changed its format, or a cache file is corrupt", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
            Self::Cli { message } => {
                format!("❌ Command error: {}\n💡 Use --help for usage information", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for LottoForgeError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::network("Request timed out", status_code, url)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else if err.is_request() {
            Self::network("Request failed", status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for LottoForgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<std::io::Error> for LottoForgeError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

impl From<rand::Error> for LottoForgeError {
    fn from(err: rand::Error) -> Self {
        Self::random(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, LottoForgeError>;



/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::LottoForgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::LottoForgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::LottoForgeError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::LottoForgeError::validation(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsatisfiable_message() {
        let err = LottoForgeError::unsatisfiable(1_000, 2);
        assert!(err.to_string().contains("1000 attempts"));
        assert!(err.user_message().contains("--max-attempts"));
    }

    #[test]
    fn test_macros() {
        let err = validation_error!("number {} out of range", 46);
        assert!(matches!(err, LottoForgeError::Validation { .. }));
        assert!(err.to_string().contains("46"));

        let err = config_error!("bad value");
        assert!(err.to_string().contains("bad value"));
    }

    #[test]
    fn test_is_network() {
        assert!(LottoForgeError::timeout("draw lookup", 5).is_network());
        assert!(LottoForgeError::network("boom", Some(500), None).is_network());
        assert!(!LottoForgeError::internal("x").is_network());
    }
}
