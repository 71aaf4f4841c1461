//! Home screen. Breathing blue ring, stored duration on the display.
//! Entry point for every user flow: press picks a project, rotate edits
//! the duration, long press opens factory reset, inactivity sleeps.

use super::{Handoff, Services, State, StateId, Transition};
use crate::config::{BLUE, SLEEP_TIMEOUT_MS};
use crate::input::InputEvent;

/// Milliseconds per breath step on the home screen.
pub(crate) const BREATH_SPEED_MS: u64 = 5;

pub(crate) struct IdleState {
    /// Cached default duration; `None` until first read from the catalog.
    duration_min: Option<u16>,
    last_activity: u64,
}

impl IdleState {
    pub(crate) fn new() -> Self {
        Self {
            duration_min: None,
            last_activity: 0,
        }
    }

    fn duration(&mut self, cx: &Services<'_>) -> u16 {
        *self
            .duration_min
            .get_or_insert_with(|| cx.catalog.default_timer_min())
    }
}

impl State for IdleState {
    fn enter(&mut self, cx: &mut Services<'_>, handoff: &Handoff, now_ms: u64) {
        // A duration handed back from the adjust screen becomes the new
        // stored default.
        if let Some(minutes) = handoff.duration_min {
            self.duration_min = Some(minutes);
            cx.catalog.set_default_timer_min(minutes);
        }
        self.last_activity = now_ms;
        cx.leds.breath(BLUE, None, false, BREATH_SPEED_MS);
    }

    fn update(&mut self, cx: &mut Services<'_>, now_ms: u64) -> Option<Transition> {
        let duration = self.duration(cx);
        while let Some(event) = cx.input.pop() {
            self.last_activity = now_ms;
            match event {
                InputEvent::Press => {
                    return Some(Transition::with(
                        StateId::ProjectSelect,
                        Handoff {
                            duration_min: Some(duration),
                            ..Handoff::default()
                        },
                    ));
                }
                InputEvent::Rotate(_) => {
                    // The first detent only opens the editor; it does
                    // not change the value yet.
                    return Some(Transition::with(
                        StateId::Adjust,
                        Handoff {
                            duration_min: Some(duration),
                            ..Handoff::default()
                        },
                    ));
                }
                InputEvent::LongPress => {
                    return Some(Transition::to(StateId::Reset));
                }
                InputEvent::DoublePress => {}
            }
        }

        cx.display.draw_idle(duration, cx.net.wifi_connected());

        if now_ms.saturating_sub(self.last_activity) >= SLEEP_TIMEOUT_MS {
            return Some(Transition::to(StateId::Sleep));
        }
        None
    }

    fn exit(&mut self, cx: &mut Services<'_>) {
        cx.leds.off();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::testutil::Fixture;

    fn entered(fx: &mut Fixture) -> IdleState {
        let mut state = IdleState::new();
        state.enter(&mut fx.services(), &Handoff::default(), 0);
        state
    }

    #[test]
    fn press_opens_project_select_with_duration() {
        let mut fx = Fixture::new();
        fx.catalog.set_default_timer_min(40);
        let mut state = entered(&mut fx);

        fx.input.push(InputEvent::Press);
        let t = state.update(&mut fx.services(), 10).unwrap();
        assert_eq!(t.to, StateId::ProjectSelect);
        assert_eq!(t.handoff.duration_min, Some(40));
    }

    #[test]
    fn rotate_opens_adjust_without_changing_value() {
        let mut fx = Fixture::new();
        fx.catalog.set_default_timer_min(40);
        let mut state = entered(&mut fx);

        fx.input.push(InputEvent::Rotate(1));
        let t = state.update(&mut fx.services(), 10).unwrap();
        assert_eq!(t.to, StateId::Adjust);
        assert_eq!(t.handoff.duration_min, Some(40));
    }

    #[test]
    fn long_press_opens_reset() {
        let mut fx = Fixture::new();
        let mut state = entered(&mut fx);

        fx.input.push(InputEvent::LongPress);
        let t = state.update(&mut fx.services(), 10).unwrap();
        assert_eq!(t.to, StateId::Reset);
    }

    #[test]
    fn adjusted_duration_is_persisted_on_entry() {
        let mut fx = Fixture::new();
        let mut state = IdleState::new();
        state.enter(
            &mut fx.services(),
            &Handoff {
                duration_min: Some(55),
                ..Handoff::default()
            },
            0,
        );
        assert_eq!(fx.catalog.default_timer_min(), 55);
        assert!(fx.catalog.is_dirty());
    }

    #[test]
    fn inactivity_goes_to_sleep_and_events_defer_it() {
        let mut fx = Fixture::new();
        let mut state = entered(&mut fx);

        assert_eq!(state.update(&mut fx.services(), SLEEP_TIMEOUT_MS - 1), None);
        // A double press is otherwise ignored but still counts as
        // activity.
        fx.input.push(InputEvent::DoublePress);
        assert_eq!(state.update(&mut fx.services(), SLEEP_TIMEOUT_MS), None);
        let t = state
            .update(&mut fx.services(), 2 * SLEEP_TIMEOUT_MS)
            .unwrap();
        assert_eq!(t.to, StateId::Sleep);
    }
}
