//! The state machine root: owns the ten states and applies transitions.

use super::adjust::AdjustState;
use super::done::DoneState;
use super::idle::{self, IdleState};
use super::paused::PausedState;
use super::project_select::ProjectSelectState;
use super::provision::ProvisionState;
use super::reset::ResetState;
use super::sleep::SleepState;
use super::startup::StartupState;
use super::timer::TimerState;
use super::{Handoff, Services, State, StateId, Transition};
use crate::config::BLUE;
use crate::led::LedPatternEngine;

/// Session state machine. Construct once, call [`begin`](Self::begin)
/// once, then [`update`](Self::update) every tick.
pub struct StateMachine {
    startup: StartupState,
    idle: IdleState,
    adjust: AdjustState,
    project_select: ProjectSelectState,
    timer: TimerState,
    paused: PausedState,
    done: DoneState,
    reset: ResetState,
    provision: ProvisionState,
    sleep: SleepState,
    current: StateId,
    /// Set while a transition's exit/enter pair runs; `update` is a
    /// no-op during that window.
    transition: bool,
    started: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            startup: StartupState::new(),
            idle: IdleState::new(),
            adjust: AdjustState::new(),
            project_select: ProjectSelectState::new(),
            timer: TimerState::new(),
            paused: PausedState::new(),
            done: DoneState::new(),
            reset: ResetState::new(),
            provision: ProvisionState::new(),
            sleep: SleepState::new(),
            current: StateId::Startup,
            transition: false,
            started: false,
        }
    }

    /// Enter the startup state. Later calls are no-ops.
    pub fn begin(&mut self, cx: &mut Services<'_>, now_ms: u64) {
        if self.started {
            return;
        }
        self.started = true;
        self.enter_current(cx, &Handoff::default(), now_ms);
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    /// True when the device sits on the home screen. The network layer
    /// gates LED color previews on this.
    pub fn is_idle(&self) -> bool {
        self.current == StateId::Idle
    }

    /// Re-assert the idle LED pattern after an external preview ends.
    /// Does nothing outside the idle state.
    pub fn reset_led_color(&self, leds: &mut LedPatternEngine) {
        if self.is_idle() {
            leds.breath(BLUE, None, false, idle::BREATH_SPEED_MS);
        }
    }

    /// Drive the active state for one tick. Returns the id of a newly
    /// entered state so the caller can log transitions.
    pub fn update(&mut self, cx: &mut Services<'_>, now_ms: u64) -> Option<StateId> {
        if self.transition || !self.started {
            return None;
        }
        let requested = match self.current {
            StateId::Startup => self.startup.update(cx, now_ms),
            StateId::Idle => self.idle.update(cx, now_ms),
            StateId::Adjust => self.adjust.update(cx, now_ms),
            StateId::ProjectSelect => self.project_select.update(cx, now_ms),
            StateId::Timer => self.timer.update(cx, now_ms),
            StateId::Paused => self.paused.update(cx, now_ms),
            StateId::Done => self.done.update(cx, now_ms),
            StateId::Reset => self.reset.update(cx, now_ms),
            StateId::Provision => self.provision.update(cx, now_ms),
            StateId::Sleep => self.sleep.update(cx, now_ms),
        };
        requested.and_then(|t| self.change_state(cx, t, now_ms))
    }

    /// Apply a transition: exit the current state, drop stale input,
    /// enter the target with its handoff. Same-state targets are no-ops.
    pub fn change_state(
        &mut self,
        cx: &mut Services<'_>,
        transition: Transition,
        now_ms: u64,
    ) -> Option<StateId> {
        if transition.to == self.current || self.transition {
            return None;
        }
        self.transition = true;

        self.exit_current(cx);
        // No event queued before the boundary may fire into the next
        // state.
        cx.input.clear();
        self.current = transition.to;
        self.enter_current(cx, &transition.handoff, now_ms);

        self.transition = false;
        Some(self.current)
    }

    fn enter_current(&mut self, cx: &mut Services<'_>, handoff: &Handoff, now_ms: u64) {
        match self.current {
            StateId::Startup => self.startup.enter(cx, handoff, now_ms),
            StateId::Idle => self.idle.enter(cx, handoff, now_ms),
            StateId::Adjust => self.adjust.enter(cx, handoff, now_ms),
            StateId::ProjectSelect => self.project_select.enter(cx, handoff, now_ms),
            StateId::Timer => self.timer.enter(cx, handoff, now_ms),
            StateId::Paused => self.paused.enter(cx, handoff, now_ms),
            StateId::Done => self.done.enter(cx, handoff, now_ms),
            StateId::Reset => self.reset.enter(cx, handoff, now_ms),
            StateId::Provision => self.provision.enter(cx, handoff, now_ms),
            StateId::Sleep => self.sleep.enter(cx, handoff, now_ms),
        }
    }

    fn exit_current(&mut self, cx: &mut Services<'_>) {
        match self.current {
            StateId::Startup => self.startup.exit(cx),
            StateId::Idle => self.idle.exit(cx),
            StateId::Adjust => self.adjust.exit(cx),
            StateId::ProjectSelect => self.project_select.exit(cx),
            StateId::Timer => self.timer.exit(cx),
            StateId::Paused => self.paused.exit(cx),
            StateId::Done => self.done.exit(cx),
            StateId::Reset => self.reset.exit(cx),
            StateId::Provision => self.provision.exit(cx),
            StateId::Sleep => self.sleep.exit(cx),
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SPLASH_DURATION_MS;
    use crate::fsm::testutil::Fixture;
    use crate::input::InputEvent;

    #[test]
    fn begin_enters_startup_once() {
        let mut fx = Fixture::new();
        let mut machine = StateMachine::new();
        machine.begin(&mut fx.services(), 0);
        assert_eq!(machine.current(), StateId::Startup);
        assert_eq!(fx.display.splashes, 1);

        // A second begin is a no-op.
        machine.begin(&mut fx.services(), 10);
        assert_eq!(fx.display.splashes, 1);
    }

    #[test]
    fn update_before_begin_does_nothing() {
        let mut fx = Fixture::new();
        let mut machine = StateMachine::new();
        assert_eq!(machine.update(&mut fx.services(), 0), None);
        assert_eq!(fx.display.splashes, 0);
    }

    #[test]
    fn same_state_transition_is_a_noop() {
        let mut fx = Fixture::new();
        let mut machine = StateMachine::new();
        machine.begin(&mut fx.services(), 0);
        let before = fx.display.splashes;
        assert_eq!(
            machine.change_state(&mut fx.services(), Transition::to(StateId::Startup), 5),
            None
        );
        assert_eq!(fx.display.splashes, before);
    }

    #[test]
    fn transition_clears_stale_input() {
        let mut fx = Fixture::new();
        let mut machine = StateMachine::new();
        machine.begin(&mut fx.services(), 0);
        fx.input.push(InputEvent::Press);
        assert_eq!(
            machine.change_state(&mut fx.services(), Transition::to(StateId::Idle), 1),
            Some(StateId::Idle)
        );
        assert!(fx.input.is_empty());
    }

    #[test]
    fn splash_timeout_selects_idle_when_provisioned() {
        let mut fx = Fixture::new();
        fx.net.provisioned = true;
        let mut machine = StateMachine::new();
        machine.begin(&mut fx.services(), 0);
        assert_eq!(machine.update(&mut fx.services(), SPLASH_DURATION_MS - 1), None);
        assert_eq!(
            machine.update(&mut fx.services(), SPLASH_DURATION_MS),
            Some(StateId::Idle)
        );
        assert!(machine.is_idle());
    }

    #[test]
    fn splash_timeout_selects_provision_when_unprovisioned() {
        let mut fx = Fixture::new();
        let mut machine = StateMachine::new();
        machine.begin(&mut fx.services(), 0);
        assert_eq!(
            machine.update(&mut fx.services(), SPLASH_DURATION_MS),
            Some(StateId::Provision)
        );
        assert!(fx.net.provisioning);
    }

    #[test]
    fn reset_led_color_restores_idle_breath() {
        let mut fx = Fixture::new();
        fx.net.provisioned = true;
        let mut machine = StateMachine::new();
        machine.begin(&mut fx.services(), 0);
        machine.update(&mut fx.services(), SPLASH_DURATION_MS);

        fx.leds.set_preview(0x123456);
        fx.leds.reset_preview();
        fx.leds.off();
        machine.reset_led_color(&mut fx.leds);
        assert!(!fx.leds.is_off());
    }
}
