//! Infrastructure layer - Serial hardware, OS discovery and configuration

pub mod config;
pub mod naming;
pub mod serial;

pub use config::ServiceConfig;
pub use naming::ConfiguredPortNames;
pub use serial::{SystemPortDiscovery, TokioSerialLink, TokioSerialOpener};
