//! Display-off power save. Everything dark; the first input event wakes
//! the device back to the home screen (the event itself is consumed by
//! the wake).

use super::{Handoff, Services, State, StateId, Transition};

pub(crate) struct SleepState;

impl SleepState {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl State for SleepState {
    fn enter(&mut self, cx: &mut Services<'_>, _handoff: &Handoff, _now_ms: u64) {
        cx.leds.off();
        cx.display.clear();
    }

    fn update(&mut self, cx: &mut Services<'_>, _now_ms: u64) -> Option<Transition> {
        if cx.input.pop().is_some() {
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
    use crate::input::InputEvent;

    #[test]
    fn sleeps_dark_until_any_input() {
        let mut fx = Fixture::new();
        fx.leds.solid(0xFF0000);
        let mut state = SleepState::new();
        state.enter(&mut fx.services(), &Handoff::default(), 0);
        assert!(fx.leds.is_off());
        assert_eq!(fx.display.last, Some(Screen::Cleared));

        assert_eq!(state.update(&mut fx.services(), 1_000), None);
        fx.input.push(InputEvent::Rotate(-1));
        let t = state.update(&mut fx.services(), 2_000).unwrap();
        assert_eq!(t.to, StateId::Idle);
    }
}
