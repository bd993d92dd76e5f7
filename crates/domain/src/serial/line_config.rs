use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Parity {
    #[default]
    None,
    Even,
    Odd,
}

/// Line parameters and exchange timing for the switch's RS232 link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,
    #[serde(default)]
    pub parity: Parity,
    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,
    #[serde(default = "default_timeout_ms")]
    pub read_timeout_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub write_timeout_ms: u64,
    /// Unconditional wait between writing a command and reading the reply.
    /// The switch controller needs it to process the command.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_read_cap")]
    pub read_cap: usize,
}

fn default_baud_rate() -> u32 {
    115_200
}
fn default_data_bits() -> u8 {
    8
}
fn default_stop_bits() -> u8 {
    1
}
fn default_timeout_ms() -> u64 {
    1000
}
fn default_settle_delay_ms() -> u64 {
    500
}
fn default_read_cap() -> usize {
    1024
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            baud_rate: default_baud_rate(),
            data_bits: default_data_bits(),
            parity: Parity::default(),
            stop_bits: default_stop_bits(),
            read_timeout_ms: default_timeout_ms(),
            write_timeout_ms: default_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            read_cap: default_read_cap(),
        }
    }
}

impl LineConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(DomainError::InvalidLineConfig(
                "Baud rate must be positive".to_string(),
            ));
        }
        if !(5..=8).contains(&self.data_bits) {
            return Err(DomainError::InvalidLineConfig(format!(
                "Invalid data bits: {}",
                self.data_bits
            )));
        }
        if !(1..=2).contains(&self.stop_bits) {
            return Err(DomainError::InvalidLineConfig(format!(
                "Invalid stop bits: {}",
                self.stop_bits
            )));
        }
        if self.read_cap == 0 {
            return Err(DomainError::InvalidLineConfig(
                "Read cap must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
