use crate::port::PortNumber;

/// Supplies the human-facing label of each KVM port
pub trait PortNaming: Send + Sync {
    fn display_name(&self, port: PortNumber) -> String;
}

/// Label used when nothing else names a port
pub fn fallback_name(port: PortNumber) -> String {
    format!("Server {}", port)
}
