//! Session summary. Breathing green that parks filled, elapsed time on
//! the display. Acknowledged by a press or by sitting out the timeout.

use super::{Handoff, Services, State, StateId, Transition};
use crate::config::{CHANGE_TIMEOUT_MS, GREEN};
use crate::input::InputEvent;
use crate::net::WebhookAction;

/// Milliseconds per breath step on the summary screen.
const BREATH_SPEED_MS: u64 = 2;

/// Breath cycles before the ring parks at full brightness.
const BREATH_CYCLES: u16 = 3;

pub(crate) struct DoneState {
    elapsed_secs: u32,
    duration_min: u16,
    entered_at: u64,
}

impl DoneState {
    pub(crate) fn new() -> Self {
        Self {
            elapsed_secs: 0,
            duration_min: 0,
            entered_at: 0,
        }
    }
}

impl State for DoneState {
    fn enter(&mut self, cx: &mut Services<'_>, handoff: &Handoff, now_ms: u64) {
        self.elapsed_secs = handoff.elapsed_secs.unwrap_or(0);
        self.duration_min = handoff.duration_min.unwrap_or(0);
        self.entered_at = now_ms;
        // Always announce the stop here as well; the webhook consumer
        // treats repeated stops as idempotent.
        cx.net
            .send_webhook(WebhookAction::Stop, self.duration_min, self.elapsed_secs);
        cx.leds.breath(GREEN, Some(BREATH_CYCLES), true, BREATH_SPEED_MS);
    }

    fn update(&mut self, cx: &mut Services<'_>, now_ms: u64) -> Option<Transition> {
        while let Some(event) = cx.input.pop() {
            if event == InputEvent::Press {
                return Some(Transition::to(StateId::Idle));
            }
        }

        cx.display.draw_done(self.elapsed_secs, self.duration_min);

        if now_ms.saturating_sub(self.entered_at) >= CHANGE_TIMEOUT_MS {
            return Some(Transition::to(StateId::Idle));
        }
        None
    }

    fn exit(&mut self, _cx: &mut Services<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::testutil::{Fixture, Screen};

    fn entered(fx: &mut Fixture) -> DoneState {
        let mut state = DoneState::new();
        state.enter(
            &mut fx.services(),
            &Handoff {
                duration_min: Some(25),
                elapsed_secs: Some(1_500),
                ..Handoff::default()
            },
            0,
        );
        state
    }

    #[test]
    fn entry_announces_the_stop() {
        let mut fx = Fixture::new();
        let mut state = entered(&mut fx);
        state.update(&mut fx.services(), 1);
        assert_eq!(fx.net.webhooks, [(WebhookAction::Stop, 25, 1_500)]);
        assert_eq!(
            fx.display.last,
            Some(Screen::Done {
                elapsed_secs: 1_500,
                duration_min: 25
            })
        );
    }

    #[test]
    fn press_acknowledges() {
        let mut fx = Fixture::new();
        let mut state = entered(&mut fx);
        fx.input.push(InputEvent::Press);
        let t = state.update(&mut fx.services(), 10).unwrap();
        assert_eq!(t.to, StateId::Idle);
    }

    #[test]
    fn times_out_to_idle() {
        let mut fx = Fixture::new();
        let mut state = entered(&mut fx);
        assert_eq!(state.update(&mut fx.services(), CHANGE_TIMEOUT_MS - 1), None);
        let t = state.update(&mut fx.services(), CHANGE_TIMEOUT_MS).unwrap();
        assert_eq!(t.to, StateId::Idle);
    }
}
