//! 32-bit cross-core command word.
//!
//! ```text
//!  31 30                  16 15                    0
//! ┌──┬──────────────────────┬──────────────────────┐
//! │K │ one-hot device marker│  value (0 – 65535)   │
//! └──┴──────────────────────┴──────────────────────┘
//!  K = 0 → OUTPUT, K = 1 → MODE
//! ```
//!
//! The device marker is a single set bit at position `16 + index`. Only
//! bits 16..=30 are usable, so indices 0..=14 are addressable. A word with
//! no marker bit decodes to device 0.

use crate::error::CommandError;

const VALUE_MASK: u32 = 0xFFFF;
const MARKER_SHIFT: u32 = 16;
const KIND_BIT: u32 = 1 << 31;

/// Number of device indices that fit between the value field and the kind bit.
pub const MAX_ADDRESSABLE_DEVICES: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Set a device's output intensity.
    Output,
    /// Set a device's automatic mode.
    Mode,
}

/// A decoded command, consumed once by the device core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub device_index: u8,
    pub value: u16,
    pub kind: CommandKind,
}

impl Command {
    pub fn output(device_index: u8, value: u16) -> Self {
        Self {
            device_index,
            value,
            kind: CommandKind::Output,
        }
    }

    pub fn mode(device_index: u8, value: u16) -> Self {
        Self {
            device_index,
            value,
            kind: CommandKind::Mode,
        }
    }

    pub fn to_word(self) -> Result<u32, CommandError> {
        encode(self.value, self.device_index, self.kind)
    }

    pub fn from_word(word: u32) -> Self {
        Self {
            device_index: device_index(word),
            value: value(word),
            kind: decode(word),
        }
    }
}

/// Pack a command into a word.
pub fn encode(value: u16, index: u8, kind: CommandKind) -> Result<u32, CommandError> {
    if index >= MAX_ADDRESSABLE_DEVICES {
        return Err(CommandError::IndexNotAddressable(index));
    }
    let mut word = u32::from(value) | (1 << (MARKER_SHIFT + u32::from(index)));
    if kind == CommandKind::Mode {
        word |= KIND_BIT;
    }
    Ok(word)
}

/// Command kind carried in bit 31.
pub fn decode(word: u32) -> CommandKind {
    if word & KIND_BIT != 0 {
        CommandKind::Mode
    } else {
        CommandKind::Output
    }
}

/// First set marker bit in 16..=30; device 0 when none is set.
pub fn device_index(word: u32) -> u8 {
    (0..MAX_ADDRESSABLE_DEVICES)
        .find(|&i| word & (1 << (MARKER_SHIFT + u32::from(i))) != 0)
        .unwrap_or(0)
}

pub fn value(word: u32) -> u16 {
    (word & VALUE_MASK) as u16
}
