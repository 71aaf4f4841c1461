//! Boot splash. Shown for a fixed duration, then the machine settles on
//! either the home screen or provisioning, depending on whether Wi-Fi
//! credentials exist.

use super::{Handoff, Services, State, StateId, Transition};
use crate::config::{SPLASH_DURATION_MS, TEAL};

pub(crate) struct StartupState {
    entered_at: u64,
}

impl StartupState {
    pub(crate) fn new() -> Self {
        Self { entered_at: 0 }
    }
}

impl State for StartupState {
    fn enter(&mut self, cx: &mut Services<'_>, _handoff: &Handoff, now_ms: u64) {
        self.entered_at = now_ms;
        cx.display.draw_splash();
        cx.leds.spinner(TEAL, None);
    }

    fn update(&mut self, cx: &mut Services<'_>, now_ms: u64) -> Option<Transition> {
        // Input during the splash is ignored; the queue is cleared at
        // the transition boundary anyway.
        if now_ms.saturating_sub(self.entered_at) < SPLASH_DURATION_MS {
            return None;
        }
        if cx.net.wifi_provisioned() {
            Some(Transition::to(StateId::Idle))
        } else {
            Some(Transition::to(StateId::Provision))
        }
    }

    fn exit(&mut self, cx: &mut Services<'_>) {
        cx.leds.off();
    }
}
