//! Wi-Fi provisioning. Solid amber while the network layer runs its
//! pairing flow; the state just polls until credentials exist and the
//! connection is up.

use super::{Handoff, Services, State, StateId, Transition};
use crate::config::AMBER;
use crate::display::Overlay;

pub(crate) struct ProvisionState;

impl ProvisionState {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl State for ProvisionState {
    fn enter(&mut self, cx: &mut Services<'_>, _handoff: &Handoff, _now_ms: u64) {
        // Drop anything queued while the radio was coming up.
        cx.input.clear();
        cx.display.draw_provision();
        cx.leds.solid(AMBER);
        cx.net.start_provisioning();
    }

    fn update(&mut self, cx: &mut Services<'_>, _now_ms: u64) -> Option<Transition> {
        if cx.net.wifi_provisioned() && cx.net.wifi_connected() {
            cx.display.play(Overlay::Connected);
            cx.net.stop_provisioning();
            return Some(Transition::to(StateId::Idle));
        }
        None
    }

    fn exit(&mut self, cx: &mut Services<'_>) {
        // Idempotent; covers leaving this state by any other path.
        cx.net.stop_provisioning();
        cx.leds.off();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::testutil::{Fixture, Screen};

    #[test]
    fn waits_until_provisioned_and_connected() {
        let mut fx = Fixture::new();
        let mut state = ProvisionState::new();
        state.enter(&mut fx.services(), &Handoff::default(), 0);
        assert!(fx.net.provisioning);
        assert_eq!(fx.display.last, Some(Screen::Provision));

        assert_eq!(state.update(&mut fx.services(), 10), None);
        fx.net.provisioned = true;
        // Credentials alone are not enough; the join must complete.
        assert_eq!(state.update(&mut fx.services(), 20), None);

        fx.net.connected = true;
        let t = state.update(&mut fx.services(), 30).unwrap();
        assert_eq!(t.to, StateId::Idle);
        assert!(!fx.net.provisioning);
        assert_eq!(fx.display.overlays, [Overlay::Connected]);
    }
}
