//! Domain layer - KVM switch protocol and serial seams
//!
//! This crate contains:
//! - Value objects (PortNumber, Command, SerialDevice, LineConfig)
//! - The fixed command table of the switch
//! - The structured outcome of a switch transaction
//! - Transport, discovery and naming interfaces (traits)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Protocol literals live here and nowhere else
//! - Testable in isolation

pub mod error;
pub mod naming;
pub mod port;
pub mod serial;
pub mod switch;

// Re-export commonly used types
pub use error::DomainError;
pub use naming::PortNaming;
pub use port::{Command, CommandTable, PortNumber};
pub use serial::{LineConfig, SerialDevice, SerialPortInfo, TransportError};
pub use switch::{SwitchErrorKind, SwitchResult};
