use std::fmt;
use std::str::FromStr;

use crate::error::{Error, WriteError};

/// Payload action applied to every record of a unit before it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    /// Forward records unchanged
    #[default]
    None,
    /// Strip name, sequence, and qualities from records that still carry them
    Compress,
    /// Restore name, sequence, and qualities of compacted records from a donor unit
    Decompress,
}
impl Action {
    /// Integer code of the action (0, 1, or 2)
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Compress => 1,
            Self::Decompress => 2,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Compress => "compress",
            Self::Decompress => "decompress",
        }
    }
}
impl TryFrom<u8> for Action {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Compress),
            2 => Ok(Self::Decompress),
            _ => Err(WriteError::InvalidAction(code.to_string()).into()),
        }
    }
}
impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "compress" => Ok(Self::Compress),
            "decompress" => Ok(Self::Decompress),
            _ => Err(WriteError::InvalidAction(s.to_string()).into()),
        }
    }
}
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
