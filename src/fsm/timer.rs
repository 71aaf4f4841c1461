//! Running session. Counts down toward zero (fill-and-decay ring in the
//! project's color), or counts up indefinitely when the duration is zero
//! (radar sweep). Press pauses, double press cancels.

use super::{Handoff, Services, State, StateId, Transition};
use crate::config::{INDETERMINATE_MIN, WHITE};
use crate::display::Overlay;
use crate::input::InputEvent;
use crate::net::WebhookAction;

pub(crate) struct TimerState {
    duration_min: u16,
    elapsed_secs: u32,
    /// Virtual session start: `now - elapsed` at entry.
    start_ms: u64,
    led_color: u32,
}

impl TimerState {
    pub(crate) fn new() -> Self {
        Self {
            duration_min: 0,
            elapsed_secs: 0,
            start_ms: 0,
            led_color: WHITE,
        }
    }

    fn indeterminate(&self) -> bool {
        self.duration_min == INDETERMINATE_MIN
    }

    fn remaining_secs(&self) -> i64 {
        i64::from(self.duration_min) * 60 - i64::from(self.elapsed_secs)
    }
}

impl State for TimerState {
    fn enter(&mut self, cx: &mut Services<'_>, handoff: &Handoff, now_ms: u64) {
        if let Some(minutes) = handoff.duration_min {
            self.duration_min = minutes;
        }
        self.elapsed_secs = handoff.elapsed_secs.unwrap_or(0);
        self.start_ms = now_ms.saturating_sub(u64::from(self.elapsed_secs) * 1_000);

        if self.elapsed_secs == 0 {
            // Fresh session, not a resume: resolve the ring color and
            // announce the start.
            self.led_color = handoff
                .project_id
                .as_ref()
                .and_then(|id| cx.catalog.project_by_id(id))
                .map(|p| p.color)
                .unwrap_or(WHITE);
            cx.net
                .send_webhook(WebhookAction::Start, self.duration_min, 0);
        }

        if self.indeterminate() {
            cx.leds.radar_sweep(self.led_color);
        } else {
            let remaining = self.remaining_secs();
            if remaining > 0 {
                cx.leds
                    .fill_and_decay(self.led_color, remaining as u64 * 1_000);
            } else {
                // Resumed past the end; update() finishes immediately.
                cx.leds.off();
            }
        }
    }

    fn update(&mut self, cx: &mut Services<'_>, now_ms: u64) -> Option<Transition> {
        self.elapsed_secs = (now_ms.saturating_sub(self.start_ms) / 1_000) as u32;

        while let Some(event) = cx.input.pop() {
            match event {
                InputEvent::Press => {
                    cx.net.send_webhook(
                        WebhookAction::Stop,
                        self.duration_min,
                        self.elapsed_secs,
                    );
                    if self.indeterminate() {
                        // No fixed end to resume toward; a press ends
                        // the session.
                        cx.display.play(Overlay::TimerDone);
                        return Some(Transition::with(
                            StateId::Done,
                            Handoff {
                                duration_min: Some(0),
                                elapsed_secs: Some(self.elapsed_secs),
                                ..Handoff::default()
                            },
                        ));
                    }
                    cx.display.play(Overlay::TimerPause);
                    return Some(Transition::with(
                        StateId::Paused,
                        Handoff {
                            duration_min: Some(self.duration_min),
                            elapsed_secs: Some(self.elapsed_secs),
                            ..Handoff::default()
                        },
                    ));
                }
                InputEvent::DoublePress => {
                    cx.net.send_webhook(
                        WebhookAction::Stop,
                        self.duration_min,
                        self.elapsed_secs,
                    );
                    cx.display.play(Overlay::Cancel);
                    return Some(Transition::to(StateId::Idle));
                }
                InputEvent::Rotate(_) | InputEvent::LongPress => {}
            }
        }

        if self.indeterminate() {
            cx.display.draw_timer(self.elapsed_secs, true);
            return None;
        }

        let remaining = self.remaining_secs();
        cx.display.draw_timer(remaining.max(0) as u32, false);
        if remaining <= 0 {
            cx.display.play(Overlay::TimerDone);
            return Some(Transition::with(
                StateId::Done,
                Handoff {
                    duration_min: Some(self.duration_min),
                    elapsed_secs: Some(u32::from(self.duration_min) * 60),
                    ..Handoff::default()
                },
            ));
        }
        None
    }

    fn exit(&mut self, _cx: &mut Services<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TEAL;
    use crate::fsm::testutil::{Fixture, Screen};
    use crate::store::Project;

    fn fresh_handoff(duration_min: u16, project_id: Option<&str>) -> Handoff {
        Handoff {
            duration_min: Some(duration_min),
            elapsed_secs: Some(0),
            project_id: project_id.map(|id| heapless::String::try_from(id).unwrap()),
        }
    }

    #[test]
    fn fresh_entry_sends_start_webhook_and_resolves_color() {
        let mut fx = Fixture::new();
        fx.catalog.add(Project::new("p-1", "Writing", TEAL)).unwrap();
        let mut state = TimerState::new();
        state.enter(&mut fx.services(), &fresh_handoff(25, Some("p-1")), 0);

        assert_eq!(fx.net.webhooks, [(WebhookAction::Start, 25, 0)]);
        assert_eq!(state.led_color, TEAL);
    }

    #[test]
    fn unknown_project_falls_back_to_white() {
        let mut fx = Fixture::new();
        let mut state = TimerState::new();
        state.enter(&mut fx.services(), &fresh_handoff(25, Some("ghost")), 0);
        assert_eq!(state.led_color, WHITE);
    }

    #[test]
    fn resume_does_not_resend_the_start_webhook() {
        let mut fx = Fixture::new();
        let mut state = TimerState::new();
        state.enter(
            &mut fx.services(),
            &Handoff {
                duration_min: Some(25),
                elapsed_secs: Some(120),
                ..Handoff::default()
            },
            500_000,
        );
        assert!(fx.net.webhooks.is_empty());
    }

    #[test]
    fn countdown_reaching_zero_completes_with_full_elapsed() {
        let mut fx = Fixture::new();
        let mut state = TimerState::new();
        state.enter(&mut fx.services(), &fresh_handoff(1, None), 0);

        assert_eq!(state.update(&mut fx.services(), 59_000), None);
        assert_eq!(
            fx.display.last,
            Some(Screen::Timer {
                seconds: 1,
                count_up: false
            })
        );

        let t = state.update(&mut fx.services(), 60_000).unwrap();
        assert_eq!(t.to, StateId::Done);
        assert_eq!(t.handoff.elapsed_secs, Some(60));
        assert_eq!(t.handoff.duration_min, Some(1));
        assert_eq!(fx.display.overlays, [Overlay::TimerDone]);
    }

    #[test]
    fn press_pauses_with_stop_webhook() {
        let mut fx = Fixture::new();
        let mut state = TimerState::new();
        state.enter(&mut fx.services(), &fresh_handoff(25, None), 0);

        fx.input.push(InputEvent::Press);
        let t = state.update(&mut fx.services(), 90_000).unwrap();
        assert_eq!(t.to, StateId::Paused);
        assert_eq!(t.handoff.elapsed_secs, Some(90));
        assert_eq!(fx.net.webhooks.last(), Some(&(WebhookAction::Stop, 25, 90)));
        assert_eq!(fx.display.overlays.last(), Some(&Overlay::TimerPause));
    }

    #[test]
    fn indeterminate_counts_up_and_press_completes() {
        let mut fx = Fixture::new();
        let mut state = TimerState::new();
        state.enter(&mut fx.services(), &fresh_handoff(0, None), 0);

        assert_eq!(state.update(&mut fx.services(), 3_600_000), None);
        assert_eq!(
            fx.display.last,
            Some(Screen::Timer {
                seconds: 3_600,
                count_up: true
            })
        );

        fx.input.push(InputEvent::Press);
        let t = state.update(&mut fx.services(), 3_700_000).unwrap();
        assert_eq!(t.to, StateId::Done);
        assert_eq!(t.handoff.elapsed_secs, Some(3_700));
        assert_eq!(
            fx.net.webhooks.last(),
            Some(&(WebhookAction::Stop, 0, 3_700))
        );
    }

    #[test]
    fn double_press_cancels_to_idle() {
        let mut fx = Fixture::new();
        let mut state = TimerState::new();
        state.enter(&mut fx.services(), &fresh_handoff(25, None), 0);

        fx.input.push(InputEvent::DoublePress);
        let t = state.update(&mut fx.services(), 10_000).unwrap();
        assert_eq!(t.to, StateId::Idle);
        assert_eq!(fx.net.webhooks.last(), Some(&(WebhookAction::Stop, 25, 10)));
        assert_eq!(fx.display.overlays.last(), Some(&Overlay::Cancel));
    }

    #[test]
    fn resume_past_the_end_finishes_immediately() {
        let mut fx = Fixture::new();
        let mut state = TimerState::new();
        state.enter(
            &mut fx.services(),
            &Handoff {
                duration_min: Some(1),
                elapsed_secs: Some(75),
                ..Handoff::default()
            },
            100_000,
        );
        assert!(fx.leds.is_off());
        let t = state.update(&mut fx.services(), 100_000).unwrap();
        assert_eq!(t.to, StateId::Done);
        assert_eq!(t.handoff.elapsed_secs, Some(60));
    }
}
