use crate::error::{DomainError, Result};

/// Value object representing a KVM input port
///
/// Rules:
/// - Must be within 1..=10
/// - Immutable once constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortNumber(u8);

impl PortNumber {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Returns true iff `raw` names a port the switch has.
    pub fn is_valid(raw: i64) -> bool {
        (Self::MIN as i64..=Self::MAX as i64).contains(&raw)
    }

    /// Create a new PortNumber with validation
    pub fn new(raw: i64) -> Result<Self> {
        if !Self::is_valid(raw) {
            return Err(DomainError::InvalidPort(raw));
        }
        Ok(Self(raw as u8))
    }

    /// All ports in ascending order
    pub fn all() -> impl Iterator<Item = PortNumber> {
        (Self::MIN..=Self::MAX).map(PortNumber)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for PortNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
