// SPDX-License-Identifier: MPL-2.0
use std::fmt;

use crate::application::port::EngineError;
use crate::domain::session::SessionState;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Export(String),
    Session(SessionError),
}

/// Errors surfaced by the viewer session to its host.
///
/// Soft failures (the spreadsheet editor not becoming available) are not
/// errors: they move the session to `EditorUnavailable` and are journaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The engine failed to start. Fatal for the session, never retried.
    EngineBootstrap(EngineError),

    /// A document was requested before the engine was up (or after it failed).
    EngineNotReady { state: SessionState },

    /// The operation is not allowed in the current state.
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// The engine rejected a document. The session keeps its previous state.
    DocumentLoad { filename: String, cause: EngineError },

    /// A local file could not be read before handing it to the engine.
    FileRead { filename: String, cause: String },
}

impl SessionError {
    /// Returns the i18n message key for this error type.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            SessionError::EngineBootstrap(_) => "error-engine-bootstrap",
            SessionError::EngineNotReady { .. } => "error-engine-not-ready",
            SessionError::InvalidState { .. } => "error-session-invalid-state",
            SessionError::DocumentLoad { .. } => "error-document-load",
            SessionError::FileRead { .. } => "error-document-read",
        }
    }

    /// Returns true if the session can no longer be used after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::EngineBootstrap(_))
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EngineBootstrap(cause) => write!(f, "{}", cause),
            SessionError::EngineNotReady { state } => {
                write!(f, "Viewer engine is not ready (session is {})", state)
            }
            SessionError::InvalidState { operation, state } => {
                write!(f, "Cannot {} while session is {}", operation, state)
            }
            SessionError::DocumentLoad { filename, cause } => {
                write!(f, "Could not load {}: {}", filename, cause)
            }
            SessionError::FileRead { filename, cause } => {
                write!(f, "Could not read {}: {}", filename, cause)
            }
        }
    }
}

impl std::error::Error for SessionError {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Export(e) => write!(f, "Export Error: {}", e),
            Error::Session(e) => write!(f, "Session Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        Error::Session(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk full".into());
        assert_eq!(format!("{}", err), "I/O Error: disk full");
    }

    #[test]
    fn display_formats_config_error() {
        let err = Error::Config("invalid".into());
        assert_eq!(format!("{}", err), "Config Error: invalid");
    }

    #[test]
    fn from_io_error_maps_to_io_variant() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(message) if message.contains("boom")));
    }

    #[test]
    fn from_toml_error_maps_to_config_variant() {
        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: Error = toml_err.into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn session_error_wraps_into_error() {
        let err: Error = SessionError::EngineNotReady {
            state: SessionState::Uninitialized,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Session Error: Viewer engine is not ready (session is uninitialized)"
        );
    }

    #[test]
    fn only_bootstrap_failure_is_fatal() {
        assert!(SessionError::EngineBootstrap(EngineError::Bootstrap("x".into())).is_fatal());
        assert!(!SessionError::DocumentLoad {
            filename: "a.pdf".into(),
            cause: EngineError::Load("bad".into()),
        }
        .is_fatal());
    }

    #[test]
    fn i18n_keys_are_distinct() {
        let keys = [
            SessionError::EngineBootstrap(EngineError::Disposed).i18n_key(),
            SessionError::EngineNotReady {
                state: SessionState::Failed,
            }
            .i18n_key(),
            SessionError::InvalidState {
                operation: "start",
                state: SessionState::EngineReady,
            }
            .i18n_key(),
            SessionError::DocumentLoad {
                filename: String::new(),
                cause: EngineError::Disposed,
            }
            .i18n_key(),
            SessionError::FileRead {
                filename: String::new(),
                cause: String::new(),
            }
            .i18n_key(),
        ];
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }
}
