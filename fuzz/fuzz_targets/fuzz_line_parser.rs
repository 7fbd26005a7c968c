//! Fuzz target: `LineAssembler::push` + `parse_inbound`
//!
//! Streams arbitrary bytes through the UART line assembler and parses
//! every completed line. Asserts the assembler never yields an empty or
//! oversized line and that a parsed command formats back to itself.
//!
//! cargo fuzz run fuzz_line_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use lightbridge::protocol::line::{Inbound, LineAssembler, MAX_LINE_LEN, parse_inbound};

fuzz_target!(|data: &[u8]| {
    let mut assembler = LineAssembler::new();
    for &byte in data {
        let Some(line) = assembler.push(byte) else {
            continue;
        };
        assert!(!line.is_empty(), "assembler must not yield empty lines");
        assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");

        let reformatted = match parse_inbound(line) {
            Some(Inbound::Device { index, value }) => format!("D{index}={value};"),
            Some(Inbound::Mode { index, value }) => format!("M{index}={value};"),
            None => continue,
        };
        assert_eq!(parse_inbound(&reformatted), parse_inbound(line));
    }
});
