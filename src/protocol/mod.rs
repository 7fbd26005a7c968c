//! Wire formats: the cross-core command word and the gateway line protocol.

pub mod command;
pub mod line;

pub use command::{Command, CommandKind};
