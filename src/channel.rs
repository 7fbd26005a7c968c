//! Cross-core command channel.
//!
//! The ingress core (producer) hands command words to the device core
//! (consumer) through a short lock-free FIFO and a doorbell. The consumer
//! keeps exactly one decoded command in flight:
//!
//! ```text
//! ┌──────────────┐ send ┌──────┐ doorbell ┌──────────────┐   pending()   ┌───────────┐
//! │ Ingress core │─────▶│ FIFO │─────────▶│ on_interrupt │──────────────▶│ Main loop │
//! │  (producer)  │      └──────┘          │  drain, keep │◀──────────────│ (device)  │
//! └──────────────┘                        │  last, slot  │ acknowledge() └───────────┘
//!                                         └──────────────┘
//! ```
//!
//! A word that arrives while the slot still holds an unacknowledged command
//! is dropped and raises the sticky `service_denied` flag, which the ingress
//! core reports upstream once and clears.
//!
//! ## Single-writer discipline
//!
//! | Field      | Writer                    | Reader          |
//! |------------|---------------------------|-----------------|
//! | `head`     | ingress (`send`)          | device          |
//! | `tail`     | device (`on_interrupt`)   | ingress         |
//! | `slot`     | device (`on_interrupt`)   | device          |
//! | `pending`  | device                    | device          |
//! | `denied`   | both set, ingress clears  | ingress         |

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::protocol::Command;

/// Words the FIFO holds before `send` refuses.
pub const FIFO_DEPTH: usize = 4;

/// One slot stays empty to tell full from empty.
const FIFO_SLOTS: usize = FIFO_DEPTH + 1;

/// Outcome of one consumer-side interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Spurious notification: the FIFO was already empty.
    Empty,
    /// The last drained word is now the pending command.
    Accepted(Command),
    /// A previous command is still pending; the drained word was dropped.
    Denied,
}

pub struct CommandChannel {
    fifo: [AtomicU32; FIFO_SLOTS],
    head: AtomicU8,
    tail: AtomicU8,
    doorbell: Signal<CriticalSectionRawMutex, ()>,
    slot: AtomicU32,
    pending: AtomicBool,
    denied: AtomicBool,
}

impl Default for CommandChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandChannel {
    pub const fn new() -> Self {
        Self {
            fifo: [const { AtomicU32::new(0) }; FIFO_SLOTS],
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            doorbell: Signal::new(),
            slot: AtomicU32::new(0),
            pending: AtomicBool::new(false),
            denied: AtomicBool::new(false),
        }
    }

    // ── Producer side (ingress core) ──────────────────────────

    /// True if the FIFO can take another word.
    pub fn is_ready(&self) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        next(head) != tail
    }

    /// Deposit a word and ring the doorbell. Never blocks.
    ///
    /// Returns `false` (and raises service denied) when the FIFO is full;
    /// the word is dropped, not queued for retry.
    pub fn send(&self, word: u32) -> bool {
        if !self.is_ready() {
            log::warn!("channel: FIFO full, dropped word 0x{:08X}", word);
            self.denied.store(true, Ordering::Release);
            return false;
        }

        let head = self.head.load(Ordering::Relaxed);
        self.fifo[head as usize].store(word, Ordering::Relaxed);
        self.head.store(next(head), Ordering::Release);
        self.doorbell.signal(());
        true
    }

    /// Read and clear the sticky service-denied flag.
    pub fn take_denied(&self) -> bool {
        self.denied.swap(false, Ordering::AcqRel)
    }

    // ── Consumer side (device core) ───────────────────────────

    /// Consume a rung doorbell, if any, and run the interrupt handler.
    pub fn service_doorbell(&self) -> Option<Delivery> {
        self.doorbell.try_take().map(|()| self.on_interrupt())
    }

    /// Interrupt handler body: drain, keep the last word, decode, flag.
    ///
    /// Short and non-blocking; it never touches device hardware.
    pub fn on_interrupt(&self) -> Delivery {
        let mut last = None;
        while let Some(word) = self.pop() {
            if let Some(dropped) = last.replace(word) {
                log::debug!("channel: burst, superseded word 0x{:08X}", dropped);
            }
        }
        let Some(word) = last else {
            return Delivery::Empty;
        };

        if self.pending.load(Ordering::Acquire) {
            log::warn!("channel: command pending, denied word 0x{:08X}", word);
            self.denied.store(true, Ordering::Release);
            return Delivery::Denied;
        }

        self.slot.store(word, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
        Delivery::Accepted(Command::from_word(word))
    }

    /// The command waiting to be (or being) applied by the main loop.
    pub fn pending(&self) -> Option<Command> {
        if self.pending.load(Ordering::Acquire) {
            Some(Command::from_word(self.slot.load(Ordering::Relaxed)))
        } else {
            None
        }
    }

    /// Mark the pending command's effects as fully applied.
    pub fn acknowledge(&self) {
        self.pending.store(false, Ordering::Release);
    }

    fn pop(&self) -> Option<u32> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if tail == head {
            return None;
        }
        let word = self.fifo[tail as usize].load(Ordering::Relaxed);
        self.tail.store(next(tail), Ordering::Release);
        Some(word)
    }
}

fn next(index: u8) -> u8 {
    (index + 1) % FIFO_SLOTS as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::command::{CommandKind, encode};

    fn word(value: u16, index: u8, kind: CommandKind) -> u32 {
        encode(value, index, kind).unwrap()
    }

    #[test]
    fn single_command_accepted() {
        let ch = CommandChannel::new();
        assert!(ch.send(word(75, 0, CommandKind::Output)));
        assert_eq!(
            ch.service_doorbell(),
            Some(Delivery::Accepted(Command::output(0, 75)))
        );
        assert_eq!(ch.pending(), Some(Command::output(0, 75)));
        assert!(!ch.take_denied());
    }

    #[test]
    fn no_doorbell_no_interrupt() {
        let ch = CommandChannel::new();
        assert_eq!(ch.service_doorbell(), None);
        assert_eq!(ch.on_interrupt(), Delivery::Empty);
    }

    #[test]
    fn second_command_before_ack_is_denied() {
        let ch = CommandChannel::new();
        ch.send(word(75, 0, CommandKind::Output));
        ch.on_interrupt();
        ch.send(word(10, 1, CommandKind::Output));
        assert_eq!(ch.on_interrupt(), Delivery::Denied);

        assert!(ch.take_denied());
        assert!(!ch.take_denied(), "denied flag must clear once reported");
        assert_eq!(ch.pending(), Some(Command::output(0, 75)));
    }

    #[test]
    fn acknowledged_slot_takes_next_command() {
        let ch = CommandChannel::new();
        ch.send(word(75, 0, CommandKind::Output));
        ch.on_interrupt();
        ch.acknowledge();
        assert_eq!(ch.pending(), None);

        ch.send(word(1, 0, CommandKind::Mode));
        assert_eq!(ch.on_interrupt(), Delivery::Accepted(Command::mode(0, 1)));
    }

    #[test]
    fn burst_keeps_last_word() {
        let ch = CommandChannel::new();
        ch.send(word(10, 0, CommandKind::Output));
        ch.send(word(20, 0, CommandKind::Output));
        ch.send(word(30, 0, CommandKind::Output));
        assert_eq!(
            ch.service_doorbell(),
            Some(Delivery::Accepted(Command::output(0, 30)))
        );
        // Coalesced notifications: the doorbell was consumed once.
        assert_eq!(ch.service_doorbell(), None);
    }

    #[test]
    fn full_fifo_refuses_and_denies() {
        let ch = CommandChannel::new();
        for v in 0..FIFO_DEPTH as u16 {
            assert!(ch.send(word(v, 0, CommandKind::Output)));
        }
        assert!(!ch.is_ready());
        assert!(!ch.send(word(99, 0, CommandKind::Output)));
        assert!(ch.take_denied());

        let last = FIFO_DEPTH as u16 - 1;
        assert_eq!(ch.on_interrupt(), Delivery::Accepted(Command::output(0, last)));
        assert!(ch.is_ready());
    }

    #[test]
    fn words_cross_threads() {
        let ch = std::sync::Arc::new(CommandChannel::new());
        let producer = {
            let ch = ch.clone();
            std::thread::spawn(move || {
                while !ch.send(word(42, 1, CommandKind::Output)) {
                    std::thread::yield_now();
                }
            })
        };
        producer.join().unwrap();
        assert_eq!(ch.service_doorbell(), Some(Delivery::Accepted(Command::output(1, 42))));
    }
}
