//! Fuzz target: cross-core command word
//!
//! Decodes arbitrary 32-bit words and checks the decoded command stays in
//! the addressable range and that re-encoding is stable.
//!
//! cargo fuzz run fuzz_command_word

#![no_main]

use libfuzzer_sys::fuzz_target;
use lightbridge::protocol::command::{Command, MAX_ADDRESSABLE_DEVICES};

fuzz_target!(|data: [u8; 4]| {
    let word = u32::from_le_bytes(data);
    let cmd = Command::from_word(word);
    assert!(cmd.device_index < MAX_ADDRESSABLE_DEVICES);

    let Ok(canonical) = cmd.to_word() else {
        panic!("decoded index {} must re-encode", cmd.device_index);
    };
    assert_eq!(Command::from_word(canonical), cmd);
});
