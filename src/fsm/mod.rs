//! Session state machine.
//!
//! The dial is modeled as ten long-lived states owned by [`StateMachine`].
//! Each tick the firmware loop calls [`StateMachine::update`] with the
//! current timestamp; the active state drains the input queue, redraws its
//! screen, and may return a [`Transition`]. The machine applies transitions
//! synchronously: `exit` on the old state, clear pending input, `enter` on
//! the new state with a typed [`Handoff`] payload.
//!
//! States talk to the outside world only through the [`Services`] registry,
//! so the whole machine runs unmodified on the host under test with mock
//! collaborators.

pub(crate) mod adjust;
pub(crate) mod done;
pub(crate) mod idle;
mod machine;
pub(crate) mod paused;
pub(crate) mod project_select;
pub(crate) mod provision;
pub(crate) mod reset;
pub(crate) mod sleep;
pub(crate) mod startup;
pub(crate) mod timer;

#[cfg(test)]
pub(crate) mod testutil;

pub use machine::StateMachine;

use crate::config::PROJECT_ID_LEN;
use crate::display::DisplayDriver;
use crate::input::InputQueue;
use crate::led::LedPatternEngine;
use crate::net::NetworkService;
use crate::store::ProjectCatalog;
use heapless::String;

/// Discriminant for the ten session states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateId {
    Startup,
    Idle,
    Adjust,
    ProjectSelect,
    Timer,
    Paused,
    Done,
    Reset,
    Provision,
    Sleep,
}

/// Typed payload carried across a transition into the next state's
/// `enter`. Fields a transition does not set stay `None` and the target
/// state falls back to its own defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Handoff {
    /// Session duration in minutes; 0 selects the indeterminate
    /// (count-up) mode.
    pub duration_min: Option<u16>,
    /// Seconds already elapsed, for pause/resume round trips.
    pub elapsed_secs: Option<u32>,
    /// Project the session is booked against; `None` is "no project".
    pub project_id: Option<String<PROJECT_ID_LEN>>,
}

/// A requested state change, returned from a state's `update`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub to: StateId,
    pub handoff: Handoff,
}

impl Transition {
    pub fn to(to: StateId) -> Self {
        Self {
            to,
            handoff: Handoff::default(),
        }
    }

    pub fn with(to: StateId, handoff: Handoff) -> Self {
        Self { to, handoff }
    }
}

/// Last-resort platform control. The only consumer is the factory-reset
/// flow, which reboots the device after wiping stored state.
pub trait SystemControl {
    fn reboot(&mut self);
}

/// Registry of collaborator borrows handed into every state callback.
pub struct Services<'a> {
    pub input: &'a mut InputQueue,
    pub display: &'a mut dyn DisplayDriver,
    pub leds: &'a mut LedPatternEngine,
    pub net: &'a mut dyn NetworkService,
    pub catalog: &'a mut ProjectCatalog,
    pub system: &'a mut dyn SystemControl,
}

/// One session state. `enter` and `exit` are side-effect-only; all
/// transition decisions come out of `update` as return values.
pub(crate) trait State {
    fn enter(&mut self, cx: &mut Services<'_>, handoff: &Handoff, now_ms: u64);
    fn update(&mut self, cx: &mut Services<'_>, now_ms: u64) -> Option<Transition>;
    fn exit(&mut self, cx: &mut Services<'_>);
}
