//! Input event decoding and queuing.
//!
//! The dial has one push button (on the encoder shaft) and a quadrature
//! encoder. Hardware edges are decoded into logical [`InputEvent`]s and
//! pushed onto a fixed-capacity [`InputQueue`]; the active session state
//! drains the queue on every tick. The queue is cleared at each state
//! transition so a stale event can never fire into a state that did not
//! observe it.
//!
//! `ButtonDecoder` and `EncoderDecoder` are pure and host-testable; the
//! embedded tasks in `hw/buttons.rs` feed them debounced GPIO levels.

use crate::config::{DOUBLE_PRESS_WINDOW_MS, INPUT_QUEUE_DEPTH, LONG_PRESS_MS};
use heapless::Deque;

/// Logical input events delivered to the session states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Single short press.
    Press,
    /// Two short presses within the double-press window.
    DoublePress,
    /// Press held past the long-press threshold.
    LongPress,
    /// Encoder rotation; positive is clockwise detents.
    Rotate(i32),
}

/// Fixed-capacity FIFO of pending input events.
///
/// Pushed from the input tasks, drained by the active state's `update()`.
/// When full, new events are dropped - the device stays responsive and
/// memory stays bounded.
#[derive(Default)]
pub struct InputQueue {
    events: Deque<InputEvent, INPUT_QUEUE_DEPTH>,
}

impl InputQueue {
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
        }
    }

    /// Queue an event; dropped silently if the queue is full.
    pub fn push(&mut self, event: InputEvent) {
        let _ = self.events.push_back(event);
    }

    /// Take the oldest pending event.
    pub fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    /// Discard all pending events. Called at state-transition
    /// boundaries.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Classification phases for the press/double/long decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ButtonPhase {
    /// Button up, nothing pending.
    Idle,
    /// Button down since the given timestamp.
    Down { since: u64 },
    /// One short press released; waiting out the double-press window.
    ReleasedOnce { at: u64 },
    /// Second press in progress.
    DownSecond,
    /// Long press already reported; waiting for release.
    HeldReported,
}

/// Single/double/long press classifier over debounced button edges.
///
/// Feed edges with [`on_edge`](Self::on_edge) and call
/// [`poll`](Self::poll) every tick: a single press is only reported once
/// the double-press window has expired without a second press, and a long
/// press fires while the button is still held.
pub struct ButtonDecoder {
    phase: ButtonPhase,
}

impl ButtonDecoder {
    pub const fn new() -> Self {
        Self {
            phase: ButtonPhase::Idle,
        }
    }

    /// Feed a debounced edge; `pressed` is true when the contact closes.
    pub fn on_edge(&mut self, pressed: bool, now_ms: u64) -> Option<InputEvent> {
        match (self.phase, pressed) {
            (ButtonPhase::Idle, true) => {
                self.phase = ButtonPhase::Down { since: now_ms };
                None
            }
            (ButtonPhase::Down { since }, false) => {
                if now_ms.saturating_sub(since) >= LONG_PRESS_MS {
                    // Released after the threshold but before poll() ran.
                    self.phase = ButtonPhase::Idle;
                    Some(InputEvent::LongPress)
                } else {
                    self.phase = ButtonPhase::ReleasedOnce { at: now_ms };
                    None
                }
            }
            (ButtonPhase::ReleasedOnce { .. }, true) => {
                self.phase = ButtonPhase::DownSecond;
                None
            }
            (ButtonPhase::DownSecond, false) => {
                self.phase = ButtonPhase::Idle;
                Some(InputEvent::DoublePress)
            }
            (ButtonPhase::HeldReported, false) => {
                self.phase = ButtonPhase::Idle;
                None
            }
            // Repeated same-level edges (contact chatter the debouncer
            // let through) leave the phase unchanged.
            _ => None,
        }
    }

    /// Time-driven classification; call once per tick.
    pub fn poll(&mut self, now_ms: u64) -> Option<InputEvent> {
        match self.phase {
            ButtonPhase::Down { since } if now_ms.saturating_sub(since) >= LONG_PRESS_MS => {
                self.phase = ButtonPhase::HeldReported;
                Some(InputEvent::LongPress)
            }
            ButtonPhase::ReleasedOnce { at }
                if now_ms.saturating_sub(at) >= DOUBLE_PRESS_WINDOW_MS =>
            {
                self.phase = ButtonPhase::Idle;
                Some(InputEvent::Press)
            }
            _ => None,
        }
    }
}

impl Default for ButtonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Quadrature decoder states.
///
/// CW:  A leads B; Idle (1,1) -> (0,1) -> (0,0) -> emit +1
/// CCW: B leads A; Idle (1,1) -> (1,0) -> (0,0) -> emit -1
#[derive(Clone, Copy, PartialEq, Eq)]
enum EncoderPhase {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Quadrature encoder decoder with noise rejection.
///
/// Emits one signed detent per full quadrature cycle; out-of-sequence
/// transitions reset to idle rather than producing spurious counts.
pub struct EncoderDecoder {
    phase: EncoderPhase,
    last_a: bool,
    last_b: bool,
}

impl EncoderDecoder {
    pub const fn new(a: bool, b: bool) -> Self {
        Self {
            phase: EncoderPhase::Idle,
            last_a: a,
            last_b: b,
        }
    }

    /// Feed the current pin levels; returns ±1 when a detent completes.
    pub fn step(&mut self, a: bool, b: bool) -> Option<i32> {
        if a == self.last_a && b == self.last_b {
            return None;
        }
        self.last_a = a;
        self.last_b = b;

        let (next, delta) = match (self.phase, a, b) {
            (EncoderPhase::Idle, false, true) => (EncoderPhase::CwStep1, None),
            (EncoderPhase::CwStep1, false, false) => (EncoderPhase::CwStep2, None),
            (EncoderPhase::CwStep2, true, false) | (EncoderPhase::CwStep2, true, true) => {
                (EncoderPhase::Idle, Some(1))
            }
            (EncoderPhase::Idle, true, false) => (EncoderPhase::CcwStep1, None),
            (EncoderPhase::CcwStep1, false, false) => (EncoderPhase::CcwStep2, None),
            (EncoderPhase::CcwStep2, false, true) | (EncoderPhase::CcwStep2, true, true) => {
                (EncoderPhase::Idle, Some(-1))
            }
            // Anything else is noise; resync on the next rest level.
            (_, true, true) => (EncoderPhase::Idle, None),
            (phase, _, _) => (phase, None),
        };
        self.phase = next;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_press_reported_after_double_window() {
        let mut b = ButtonDecoder::new();
        assert_eq!(b.on_edge(true, 0), None);
        assert_eq!(b.on_edge(false, 100), None);
        // Window still open: nothing yet.
        assert_eq!(b.poll(200), None);
        assert_eq!(b.poll(100 + DOUBLE_PRESS_WINDOW_MS), Some(InputEvent::Press));
        assert_eq!(b.poll(1_000), None);
    }

    #[test]
    fn double_press_within_window() {
        let mut b = ButtonDecoder::new();
        b.on_edge(true, 0);
        b.on_edge(false, 80);
        b.on_edge(true, 200);
        assert_eq!(b.on_edge(false, 280), Some(InputEvent::DoublePress));
        assert_eq!(b.poll(2_000), None);
    }

    #[test]
    fn long_press_fires_while_held() {
        let mut b = ButtonDecoder::new();
        b.on_edge(true, 0);
        assert_eq!(b.poll(LONG_PRESS_MS - 1), None);
        assert_eq!(b.poll(LONG_PRESS_MS), Some(InputEvent::LongPress));
        // Release produces nothing further.
        assert_eq!(b.on_edge(false, LONG_PRESS_MS + 500), None);
        assert_eq!(b.poll(LONG_PRESS_MS + 1_000), None);
    }

    #[test]
    fn long_press_on_release_without_poll() {
        let mut b = ButtonDecoder::new();
        b.on_edge(true, 0);
        assert_eq!(
            b.on_edge(false, LONG_PRESS_MS + 10),
            Some(InputEvent::LongPress)
        );
    }

    #[test]
    fn encoder_full_cw_cycle_emits_plus_one() {
        let mut e = EncoderDecoder::new(true, true);
        assert_eq!(e.step(false, true), None);
        assert_eq!(e.step(false, false), None);
        assert_eq!(e.step(true, false), Some(1));
    }

    #[test]
    fn encoder_full_ccw_cycle_emits_minus_one() {
        let mut e = EncoderDecoder::new(true, true);
        assert_eq!(e.step(true, false), None);
        assert_eq!(e.step(false, false), None);
        assert_eq!(e.step(false, true), Some(-1));
    }

    #[test]
    fn encoder_noise_is_rejected() {
        let mut e = EncoderDecoder::new(true, true);
        assert_eq!(e.step(false, true), None);
        // Bounce back to rest: no count, and a following clean cycle works.
        assert_eq!(e.step(true, true), None);
        assert_eq!(e.step(false, true), None);
        assert_eq!(e.step(false, false), None);
        assert_eq!(e.step(true, false), Some(1));
    }

    #[test]
    fn queue_drops_when_full_and_clears() {
        let mut q = InputQueue::new();
        for _ in 0..INPUT_QUEUE_DEPTH + 3 {
            q.push(InputEvent::Press);
        }
        let mut drained = 0;
        while q.pop().is_some() {
            drained += 1;
        }
        assert_eq!(drained, INPUT_QUEUE_DEPTH);

        q.push(InputEvent::Rotate(1));
        q.clear();
        assert!(q.is_empty());
    }
}
