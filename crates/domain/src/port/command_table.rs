use serde::Serialize;

use super::PortNumber;

/// Control strings of the MLEEDA KVM1001A, indexed by `port - 1`.
/// Bit-exact to the hardware protocol.
static PORT_COMMANDS: [&str; 10] = [
    "X1,1$", "X2,1$", "X3,1$", "X4,1$", "X5,1$", "X6,1$", "X7,1$", "X8,1$", "X9,1$", "XA,1$",
];

/// A literal ASCII control string drawn from the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Command(&'static str);

impl Command {
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Fixed mapping from port number to switch command
pub struct CommandTable;

impl CommandTable {
    /// Total over validated ports; `PortNumber` cannot hold anything else.
    pub fn lookup(port: PortNumber) -> Command {
        Command(PORT_COMMANDS[usize::from(port.get() - 1)])
    }

    /// Every `(port, command)` pair in port order
    pub fn entries() -> impl Iterator<Item = (PortNumber, Command)> {
        PortNumber::all().map(|port| (port, Self::lookup(port)))
    }
}
