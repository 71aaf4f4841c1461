//! Factory reset chooser. Breathing magenta; rotate picks RESET or
//! CANCEL, press confirms. A confirmed reset wipes Wi-Fi credentials and
//! the stored catalog, then reboots after a short grace period so the
//! display can show the farewell.

use super::{Handoff, Services, State, StateId, Transition};
use crate::config::{MAGENTA, RESET_REBOOT_GRACE_MS};
use crate::display::Overlay;
use crate::input::InputEvent;

/// Milliseconds per breath step on the reset screen.
const BREATH_SPEED_MS: u64 = 10;

pub(crate) struct ResetState {
    reset_selected: bool,
    /// Timestamp of a confirmed wipe; reboot fires after the grace
    /// period.
    wiped_at: Option<u64>,
}

impl ResetState {
    pub(crate) fn new() -> Self {
        Self {
            reset_selected: false,
            wiped_at: None,
        }
    }
}

impl State for ResetState {
    fn enter(&mut self, cx: &mut Services<'_>, _handoff: &Handoff, _now_ms: u64) {
        self.reset_selected = false;
        self.wiped_at = None;
        cx.leds.breath(MAGENTA, None, false, BREATH_SPEED_MS);
    }

    fn update(&mut self, cx: &mut Services<'_>, now_ms: u64) -> Option<Transition> {
        if let Some(wiped_at) = self.wiped_at {
            // Point of no return; ignore further input.
            if now_ms.saturating_sub(wiped_at) >= RESET_REBOOT_GRACE_MS {
                cx.system.reboot();
            }
            return None;
        }

        while let Some(event) = cx.input.pop() {
            match event {
                InputEvent::Rotate(delta) => {
                    self.reset_selected = delta > 0;
                }
                InputEvent::Press => {
                    if !self.reset_selected {
                        cx.display.play(Overlay::Cancel);
                        return Some(Transition::to(StateId::Idle));
                    }
                    cx.display.play(Overlay::FactoryReset);
                    cx.net.reset_credentials();
                    cx.catalog.wipe();
                    self.wiped_at = Some(now_ms);
                }
                InputEvent::DoublePress | InputEvent::LongPress => {}
            }
        }

        cx.display.draw_reset(self.reset_selected);
        None
    }

    fn exit(&mut self, cx: &mut Services<'_>) {
        cx.leds.off();
    }
}
