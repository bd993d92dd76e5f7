use serde::Serialize;

use super::SwitchErrorKind;
use crate::error::DomainError;
use crate::port::{Command, PortNumber};

/// Outcome of one switch transaction.
///
/// Only the three constructors build it, which keeps the invariants:
/// - `success` implies a table command and no error
/// - a failure always carries an error kind and message
/// - the command is empty only when the port never passed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchResult {
    success: bool,
    port: i64,
    command: String,
    response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<SwitchErrorKind>,
}

impl SwitchResult {
    /// The requested port was rejected before any lookup or device access
    pub fn invalid_port(port: i64) -> Self {
        Self {
            success: false,
            port,
            command: String::new(),
            response: String::new(),
            error: Some(DomainError::InvalidPort(port).to_string()),
            error_kind: Some(SwitchErrorKind::InvalidPort),
        }
    }

    pub fn succeeded(port: PortNumber, command: Command, response: String) -> Self {
        Self {
            success: true,
            port: port.get().into(),
            command: command.as_str().to_string(),
            response,
            error: None,
            error_kind: None,
        }
    }

    pub fn failed(
        port: PortNumber,
        command: Command,
        kind: SwitchErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            port: port.get().into(),
            command: command.as_str().to_string(),
            response: String::new(),
            error: Some(message.into()),
            error_kind: Some(kind),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn port(&self) -> i64 {
        self.port
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<SwitchErrorKind> {
        self.error_kind
    }
}
