//! Duration editor. Solid amber ring; each detent moves the duration in
//! five-minute steps within the clamp range. Press saves, inactivity
//! abandons the edit.

use super::{Handoff, Services, State, StateId, Transition};
use crate::config::{
    ADJUST_STEP_MIN, AMBER, CHANGE_TIMEOUT_MS, DEFAULT_TIMER_MIN, MAX_TIMER_MIN, MIN_TIMER_MIN,
};
use crate::display::Overlay;
use crate::input::InputEvent;

pub(crate) struct AdjustState {
    minutes: u16,
    last_activity: u64,
}

impl AdjustState {
    pub(crate) fn new() -> Self {
        Self {
            minutes: DEFAULT_TIMER_MIN,
            last_activity: 0,
        }
    }
}

impl State for AdjustState {
    fn enter(&mut self, cx: &mut Services<'_>, handoff: &Handoff, now_ms: u64) {
        self.minutes = handoff.duration_min.unwrap_or(DEFAULT_TIMER_MIN);
        self.last_activity = now_ms;
        cx.leds.solid(AMBER);
    }

    fn update(&mut self, cx: &mut Services<'_>, now_ms: u64) -> Option<Transition> {
        while let Some(event) = cx.input.pop() {
            self.last_activity = now_ms;
            match event {
                InputEvent::Rotate(delta) => {
                    let stepped =
                        i32::from(self.minutes) + delta * i32::from(ADJUST_STEP_MIN);
                    self.minutes = stepped
                        .clamp(i32::from(MIN_TIMER_MIN), i32::from(MAX_TIMER_MIN))
                        as u16;
                }
                InputEvent::Press => {
                    cx.display.play(Overlay::Confirm);
                    return Some(Transition::with(
                        StateId::Idle,
                        Handoff {
                            duration_min: Some(self.minutes),
                            ..Handoff::default()
                        },
                    ));
                }
                InputEvent::DoublePress | InputEvent::LongPress => {}
            }
        }

        cx.display.draw_adjust(self.minutes, cx.net.wifi_connected());

        if now_ms.saturating_sub(self.last_activity) >= CHANGE_TIMEOUT_MS {
            // Abandon the edit; the stored default stays untouched.
            return Some(Transition::to(StateId::Idle));
        }
        None
    }

    fn exit(&mut self, _cx: &mut Services<'_>) {}
}
