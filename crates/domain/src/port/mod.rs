mod command_table;
mod port_number;

pub use command_table::{Command, CommandTable};
pub use port_number::PortNumber;
