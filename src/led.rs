//! LED ring pattern engine.
//!
//! Generates frames for the 16-pixel WS2812 ring. Session states select a
//! pattern (solid, breath, fill-and-decay, spinner, radar sweep) and the
//! tick loop calls [`LedPatternEngine::tick`] to get the current frame to
//! write out. All integer math, no heap - fully host-testable.
//!
//! A preview override sits above the running pattern: the network layer
//! may paint the whole ring one color while the device is idle (it must
//! gate this on `StateMachine::is_idle()`), and `reset_preview` falls back
//! to whatever pattern is still running underneath.

use crate::config::{LED_BRIGHTNESS, RADAR_STEP_MS, RING_LEDS, SPINNER_STEP_MS};
use smart_leds::RGB8;

/// One frame of ring pixels.
pub type Frame = [RGB8; RING_LEDS];

/// Brightness steps per breath half-cycle.
const BREATH_STEPS: u64 = 32;

/// Pixels of fading tail behind the radar-sweep head.
const RADAR_TAIL: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pattern {
    Off,
    Solid {
        color: u32,
    },
    Breath {
        color: u32,
        /// `None` repeats forever.
        cycles: Option<u16>,
        /// Whether a cycle-limited breath parks at full brightness.
        end_filled: bool,
        /// Milliseconds per brightness step; smaller is faster.
        speed_ms: u64,
    },
    FillAndDecay {
        color: u32,
        duration_ms: u64,
    },
    Spinner {
        color: u32,
        cycles: Option<u16>,
    },
    RadarSweep {
        color: u32,
    },
}

/// Ring animation engine; one pattern active at a time.
pub struct LedPatternEngine {
    pattern: Pattern,
    /// Tick timestamp at which the current pattern started; latched on
    /// the first tick after a pattern change.
    epoch: Option<u64>,
    preview: Option<u32>,
}

impl LedPatternEngine {
    pub const fn new() -> Self {
        Self {
            pattern: Pattern::Off,
            epoch: None,
            preview: None,
        }
    }

    pub fn solid(&mut self, color: u32) {
        self.set(Pattern::Solid { color });
    }

    pub fn breath(&mut self, color: u32, cycles: Option<u16>, end_filled: bool, speed_ms: u64) {
        self.set(Pattern::Breath {
            color,
            cycles,
            end_filled,
            speed_ms: speed_ms.max(1),
        });
    }

    /// Light the whole ring, then retire one pixel per elapsed
    /// 1/16th of `duration_ms`.
    pub fn fill_and_decay(&mut self, color: u32, duration_ms: u64) {
        self.set(Pattern::FillAndDecay {
            color,
            duration_ms: duration_ms.max(1),
        });
    }

    pub fn spinner(&mut self, color: u32, cycles: Option<u16>) {
        self.set(Pattern::Spinner { color, cycles });
    }

    pub fn radar_sweep(&mut self, color: u32) {
        self.set(Pattern::RadarSweep { color });
    }

    pub fn off(&mut self) {
        self.set(Pattern::Off);
    }

    /// Paint the whole ring one color until [`reset_preview`] is called.
    ///
    /// [`reset_preview`]: Self::reset_preview
    pub fn set_preview(&mut self, color: u32) {
        self.preview = Some(color);
    }

    /// Drop the preview override; the underlying pattern resumes.
    pub fn reset_preview(&mut self) {
        self.preview = None;
    }

    /// True when no pattern is running and no preview is set.
    pub fn is_off(&self) -> bool {
        self.pattern == Pattern::Off && self.preview.is_none()
    }

    fn set(&mut self, pattern: Pattern) {
        self.pattern = pattern;
        self.epoch = None;
    }

    /// Advance the animation and return the frame for `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Frame {
        if let Some(color) = self.preview {
            return [rgb(color, 255); RING_LEDS];
        }

        let epoch = *self.epoch.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(epoch);

        match self.pattern {
            Pattern::Off => [RGB8::default(); RING_LEDS],
            Pattern::Solid { color } => [rgb(color, 255); RING_LEDS],
            Pattern::Breath {
                color,
                cycles,
                end_filled,
                speed_ms,
            } => {
                let step = elapsed / speed_ms;
                let cycle = step / (2 * BREATH_STEPS);
                if let Some(n) = cycles {
                    if cycle >= u64::from(n) {
                        let level = if end_filled { 255 } else { 0 };
                        return [rgb(color, level); RING_LEDS];
                    }
                }
                let phase = step % (2 * BREATH_STEPS);
                // Triangle wave: ramp up for 32 steps, down for 32.
                let ramp = if phase < BREATH_STEPS {
                    phase
                } else {
                    2 * BREATH_STEPS - 1 - phase
                };
                let level = ((ramp * 255) / (BREATH_STEPS - 1)) as u8;
                [rgb(color, level); RING_LEDS]
            }
            Pattern::FillAndDecay { color, duration_ms } => {
                let lit = if elapsed >= duration_ms {
                    0
                } else {
                    let remaining = duration_ms - elapsed;
                    // Round up so the last pixel survives to the end.
                    ((remaining * RING_LEDS as u64).div_ceil(duration_ms)) as usize
                };
                let mut frame = [RGB8::default(); RING_LEDS];
                for px in frame.iter_mut().take(lit) {
                    *px = rgb(color, 255);
                }
                frame
            }
            Pattern::Spinner { color, cycles } => {
                let step = elapsed / SPINNER_STEP_MS;
                if let Some(n) = cycles {
                    if step / RING_LEDS as u64 >= u64::from(n) {
                        return [RGB8::default(); RING_LEDS];
                    }
                }
                let mut frame = [RGB8::default(); RING_LEDS];
                frame[(step % RING_LEDS as u64) as usize] = rgb(color, 255);
                frame
            }
            Pattern::RadarSweep { color } => {
                let head = (elapsed / RADAR_STEP_MS) as usize % RING_LEDS;
                let mut frame = [RGB8::default(); RING_LEDS];
                for i in 0..=RADAR_TAIL {
                    let px = (head + RING_LEDS - i) % RING_LEDS;
                    frame[px] = rgb(color, 255 >> i);
                }
                frame
            }
        }
    }
}

impl Default for LedPatternEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a `0xRRGGBB` color at the given level, applying the global
/// brightness cap.
fn rgb(color: u32, level: u8) -> RGB8 {
    let scale = |c: u32| -> u8 {
        let v = c * u32::from(level) * u32::from(LED_BRIGHTNESS) / (255 * 255);
        v as u8
    };
    RGB8::new(
        scale((color >> 16) & 0xFF),
        scale((color >> 8) & 0xFF),
        scale(color & 0xFF),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BLUE, GREEN, RED, TEAL, WHITE};

    fn lit_count(frame: &Frame) -> usize {
        frame
            .iter()
            .filter(|px| px.r != 0 || px.g != 0 || px.b != 0)
            .count()
    }

    #[test]
    fn off_engine_emits_black() {
        let mut leds = LedPatternEngine::new();
        assert!(leds.is_off());
        assert_eq!(lit_count(&leds.tick(0)), 0);
    }

    #[test]
    fn solid_fills_the_ring() {
        let mut leds = LedPatternEngine::new();
        leds.solid(RED);
        let frame = leds.tick(10);
        assert_eq!(lit_count(&frame), RING_LEDS);
        assert!(frame[0].r > 0);
        assert_eq!(frame[0].g, 0);
        assert_eq!(frame[0].b, 0);
    }

    #[test]
    fn preview_overrides_and_resets() {
        let mut leds = LedPatternEngine::new();
        leds.solid(RED);
        leds.set_preview(BLUE);
        let frame = leds.tick(0);
        assert_eq!(frame[0].r, 0);
        assert!(frame[0].b > 0);

        leds.reset_preview();
        let frame = leds.tick(1);
        assert!(frame[0].r > 0);
        assert_eq!(frame[0].b, 0);
    }

    #[test]
    fn fill_and_decay_retires_pixels_over_time() {
        let mut leds = LedPatternEngine::new();
        leds.fill_and_decay(WHITE, 1_600);
        assert_eq!(lit_count(&leds.tick(0)), RING_LEDS);
        assert_eq!(lit_count(&leds.tick(800)), RING_LEDS / 2);
        // Just before the end a single pixel survives.
        assert_eq!(lit_count(&leds.tick(1_599)), 1);
        assert_eq!(lit_count(&leds.tick(1_600)), 0);
        assert_eq!(lit_count(&leds.tick(10_000)), 0);
    }

    #[test]
    fn breath_ramps_and_parks_filled() {
        let mut leds = LedPatternEngine::new();
        leds.breath(GREEN, Some(1), true, 10);
        let dim = leds.tick(0);
        let mid = leds.tick(16 * 10);
        assert!(mid[0].g > dim[0].g);
        // One full cycle is 64 steps; afterwards it parks filled.
        let parked = leds.tick(64 * 10 + 5);
        let parked_again = leds.tick(64 * 10 + 500);
        assert_eq!(parked, parked_again);
        assert!(parked[0].g > 0);
    }

    #[test]
    fn breath_without_end_filled_goes_dark() {
        let mut leds = LedPatternEngine::new();
        leds.breath(GREEN, Some(1), false, 10);
        let parked = leds.tick(64 * 10 + 5);
        assert_eq!(lit_count(&parked), 0);
    }

    #[test]
    fn spinner_walks_one_pixel() {
        let mut leds = LedPatternEngine::new();
        leds.spinner(TEAL, None);
        let a = leds.tick(0);
        let b = leds.tick(SPINNER_STEP_MS);
        assert_eq!(lit_count(&a), 1);
        assert_eq!(lit_count(&b), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn radar_sweep_has_a_tail() {
        let mut leds = LedPatternEngine::new();
        leds.radar_sweep(WHITE);
        let frame = leds.tick(RADAR_STEP_MS * 8);
        assert_eq!(lit_count(&frame), RADAR_TAIL + 1);
    }
}
