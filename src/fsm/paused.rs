//! Paused session. Breathing yellow; press resumes, double press
//! cancels, and a long-forgotten pause cancels itself.

use super::{Handoff, Services, State, StateId, Transition};
use crate::config::{PAUSE_TIMEOUT_MS, YELLOW};
use crate::display::Overlay;
use crate::input::InputEvent;
use crate::net::WebhookAction;

/// Milliseconds per breath step while paused; noticeably slower than
/// the idle breath.
const BREATH_SPEED_MS: u64 = 20;

pub(crate) struct PausedState {
    duration_min: u16,
    elapsed_secs: u32,
    paused_at: u64,
}

impl PausedState {
    pub(crate) fn new() -> Self {
        Self {
            duration_min: 0,
            elapsed_secs: 0,
            paused_at: 0,
        }
    }

    fn cancel(&self, cx: &mut Services<'_>) -> Transition {
        cx.net
            .send_webhook(WebhookAction::Stop, self.duration_min, self.elapsed_secs);
        cx.display.play(Overlay::Cancel);
        Transition::to(StateId::Idle)
    }
}

impl State for PausedState {
    fn enter(&mut self, cx: &mut Services<'_>, handoff: &Handoff, now_ms: u64) {
        if let Some(minutes) = handoff.duration_min {
            self.duration_min = minutes;
        }
        if let Some(elapsed) = handoff.elapsed_secs {
            self.elapsed_secs = elapsed;
        }
        self.paused_at = now_ms;
        cx.leds.breath(YELLOW, None, false, BREATH_SPEED_MS);
    }

    fn update(&mut self, cx: &mut Services<'_>, now_ms: u64) -> Option<Transition> {
        while let Some(event) = cx.input.pop() {
            match event {
                InputEvent::Press => {
                    cx.net.send_webhook(
                        WebhookAction::Start,
                        self.duration_min,
                        self.elapsed_secs,
                    );
                    cx.display.play(Overlay::TimerResume);
                    return Some(Transition::with(
                        StateId::Timer,
                        Handoff {
                            duration_min: Some(self.duration_min),
                            elapsed_secs: Some(self.elapsed_secs),
                            ..Handoff::default()
                        },
                    ));
                }
                InputEvent::DoublePress => {
                    return Some(self.cancel(cx));
                }
                InputEvent::Rotate(_) | InputEvent::LongPress => {}
            }
        }

        let remaining =
            (i64::from(self.duration_min) * 60 - i64::from(self.elapsed_secs)).max(0);
        cx.display.draw_paused(remaining as u32);

        if now_ms.saturating_sub(self.paused_at) >= PAUSE_TIMEOUT_MS {
            return Some(self.cancel(cx));
        }
        None
    }

    fn exit(&mut self, _cx: &mut Services<'_>) {}
}
