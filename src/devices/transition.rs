//! One in-flight smooth transition.
//!
//! ```text
//!   ┌──────────┐ step due ┌──────────┐ position == target ┌──────────┐
//!   │ STEPPING │─────────▶│  write   │───────────────────▶│   DONE   │
//!   │ (wait)   │◀─────────│ position │  final exact write └──────────┘
//!   └──────────┘  +delay  └──────────┘
//! ```
//!
//! Register values `start, start±1, …` up to one unit short of the target
//! are each written after one step delay, then the exact target is written
//! immediately after the last step. Step deadlines are fixed at start, so
//! a loop that polls late writes the missed steps back to back and the
//! ramp keeps its overall duration.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing due yet.
    Wait,
    /// Write this intermediate register value.
    Write(u32),
    /// Write the exact target; the transition is over.
    Finish(u32),
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub device: usize,
    /// Intensity recorded once the transition completes.
    pub target_intensity: u8,
    position: u32,
    target: u32,
    step_delay_ms: u32,
    next_due_ms: u64,
}

impl Transition {
    pub fn new(
        device: usize,
        target_intensity: u8,
        from_register: u32,
        to_register: u32,
        step_delay_ms: u32,
        now_ms: u64,
    ) -> Self {
        Self {
            device,
            target_intensity,
            position: from_register,
            target: to_register,
            step_delay_ms,
            next_due_ms: now_ms + u64::from(step_delay_ms),
        }
    }

    /// Register steps still to be written before the final one.
    pub fn remaining_steps(&self) -> u32 {
        self.position.abs_diff(self.target)
    }

    /// Advance by at most one write.
    pub fn next_step(&mut self, now_ms: u64) -> Step {
        if self.position == self.target {
            return Step::Finish(self.target);
        }
        if now_ms < self.next_due_ms {
            return Step::Wait;
        }
        let value = self.position;
        if self.position < self.target {
            self.position += 1;
        } else {
            self.position -= 1;
        }
        self.next_due_ms += u64::from(self.step_delay_ms);
        Step::Write(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascending_steps_then_exact_target() {
        let mut t = Transition::new(0, 1, 10, 13, 1, 0);
        assert_eq!(t.next_step(0), Step::Wait);
        assert_eq!(t.next_step(1), Step::Write(10));
        assert_eq!(t.next_step(1), Step::Wait);
        assert_eq!(t.next_step(2), Step::Write(11));
        assert_eq!(t.next_step(3), Step::Write(12));
        assert_eq!(t.next_step(3), Step::Finish(13));
    }

    #[test]
    fn descending_steps() {
        let mut t = Transition::new(0, 0, 3, 1, 0, 0);
        assert_eq!(t.next_step(0), Step::Write(3));
        assert_eq!(t.next_step(0), Step::Write(2));
        assert_eq!(t.next_step(0), Step::Finish(1));
    }

    #[test]
    fn late_poll_catches_up() {
        let mut t = Transition::new(0, 1, 0, 5, 2, 0);
        // Steps due at 2, 4, 6.
        assert_eq!(t.next_step(6), Step::Write(0));
        assert_eq!(t.next_step(6), Step::Write(1));
        assert_eq!(t.next_step(6), Step::Write(2));
        assert_eq!(t.next_step(6), Step::Wait);
    }

    #[test]
    fn same_register_finishes_immediately() {
        let mut t = Transition::new(1, 1, 0, 0, 5, 100);
        assert_eq!(t.remaining_steps(), 0);
        assert_eq!(t.next_step(100), Step::Finish(0));
    }
}
