//! Gateway line protocol.
//!
//! Inbound (gateway → MCU):
//!
//! | Line             | Meaning                          |
//! |------------------|----------------------------------|
//! | `D<i>=<v>;`      | set device `i` output to `v`     |
//! | `M<i>=<v>;`      | set device `i` mode to `v`       |
//!
//! Outbound (MCU → gateway):
//!
//! | Line             | Meaning                          |
//! |------------------|----------------------------------|
//! | `D<i>=<v>;`      | device `i` now at intensity `v`  |
//! | `S<i>=<f>;`      | sensor `i` reading               |
//! | `C<k>=[<text>];` | comment from source `k`          |
//!
//! Lines end with `\n` or `\r`. The line assembler runs at UART byte rate
//! and never allocates.

use core::fmt::Write;

use heapless::{String, Vec};

/// Longest inbound line accepted; longer lines are discarded whole.
pub const MAX_LINE_LEN: usize = 128;

/// Capacity of a formatted outbound line (comments echo a full inbound line).
pub const OUT_LINE_CAP: usize = MAX_LINE_LEN + 16;

pub type OutLine = String<OUT_LINE_CAP>;

/// Source tag of a `C` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommentSource {
    Mcu = 0,
    Gateway = 1,
}

/// A recognised inbound line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    Device { index: u8, value: u16 },
    Mode { index: u8, value: u16 },
}

// ---------------------------------------------------------------------------
// Line assembly
// ---------------------------------------------------------------------------

/// Accumulates UART bytes until a terminator.
pub struct LineAssembler {
    buf: Vec<u8, MAX_LINE_LEN>,
    overflowed: bool,
    /// A completed line is still borrowed out; clear before the next byte.
    complete: bool,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
            complete: false,
        }
    }

    /// Feed one byte. Returns the completed line on a terminator.
    ///
    /// Empty lines (e.g. the `\n` of a `\r\n` pair) yield nothing. The
    /// returned slice is valid until the next call.
    pub fn push(&mut self, byte: u8) -> Option<&str> {
        if self.complete {
            self.buf.clear();
            self.complete = false;
        }

        if byte != b'\n' && byte != b'\r' {
            if self.buf.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        if self.overflowed {
            log::warn!("uart: discarded line longer than {} bytes", MAX_LINE_LEN);
            self.overflowed = false;
            self.buf.clear();
            return None;
        }
        if self.buf.is_empty() {
            return None;
        }

        self.complete = true;
        match core::str::from_utf8(&self.buf) {
            Ok(line) => Some(line),
            Err(_) => {
                log::debug!("uart: dropped non-UTF-8 line");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound parsing
// ---------------------------------------------------------------------------

/// Parse a command line. Anything unrecognised returns `None`.
///
/// Leading/trailing whitespace is tolerated and the trailing `;` is
/// optional. Values must fit the 16-bit payload field.
pub fn parse_inbound(line: &str) -> Option<Inbound> {
    let line = line.trim();
    let line = line.strip_suffix(';').unwrap_or(line);
    let (tag, rest) = line.split_at_checked(1)?;
    let (index, value) = rest.split_once('=')?;
    let index: u8 = parse_digits(index)?;
    let value: u16 = parse_digits(value)?;

    match tag {
        "D" => Some(Inbound::Device { index, value }),
        "M" => Some(Inbound::Mode { index, value }),
        _ => None,
    }
}

/// Decimal digits only: no sign, no whitespace, no empty field.
fn parse_digits<T: core::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ---------------------------------------------------------------------------
// Outbound formatting
// ---------------------------------------------------------------------------

pub fn device_line(index: usize, intensity: u8) -> OutLine {
    let mut out = OutLine::new();
    let _ = write!(out, "D{}={};", index, intensity);
    out
}

pub fn sensor_line(index: usize, value: f32) -> OutLine {
    let mut out = OutLine::new();
    let _ = write!(out, "S{}={:.6};", index, value);
    out
}

/// `C<k>=[<text>];`, truncating `text` to fit the line buffer.
pub fn comment_line(source: CommentSource, text: &str) -> OutLine {
    let mut out = OutLine::new();
    let _ = write!(out, "C{}=[", source as u8);
    // Reserve room for the closing "];".
    let room = OUT_LINE_CAP - out.len() - 2;
    let mut end = text.len().min(room);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let _ = out.push_str(&text[..end]);
    let _ = out.push_str("];");
    out
}
