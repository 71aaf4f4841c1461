//! Project picker. The list is the synthetic "No Project" entry followed
//! by the catalog; the ring shows the selection's color. Press starts a
//! session against the selection, double press or inactivity backs out.

use super::{Handoff, Services, State, StateId, Transition};
use crate::config::{MAX_PROJECTS, NO_PROJECT_LABEL, PROJECT_SELECT_TIMEOUT_MS, RED};
use crate::display::Overlay;
use crate::input::InputEvent;
use crate::store::Project;
use heapless::Vec;

pub(crate) struct ProjectSelectState {
    /// Picker entries; index 0 is always "No Project".
    items: Vec<Project, { MAX_PROJECTS + 1 }>,
    selected: usize,
    duration_min: u16,
    needs_render: bool,
    last_activity: u64,
}

impl ProjectSelectState {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            duration_min: 0,
            needs_render: false,
            last_activity: 0,
        }
    }

    fn render(&mut self, cx: &mut Services<'_>) {
        cx.display.draw_project_select(&self.items, self.selected);
        cx.leds.solid(self.items[self.selected].color);
        self.needs_render = false;
    }
}

impl State for ProjectSelectState {
    fn enter(&mut self, cx: &mut Services<'_>, handoff: &Handoff, now_ms: u64) {
        self.items.clear();
        let _ = self.items.push(Project::new("", NO_PROJECT_LABEL, RED));
        for project in cx.catalog.projects() {
            let _ = self.items.push(project.clone());
        }

        self.duration_min = handoff
            .duration_min
            .unwrap_or_else(|| cx.catalog.default_timer_min());
        // Restore the last-used selection; a stale index falls back to
        // "No Project".
        self.selected = match cx.catalog.last_index() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.last_activity = now_ms;
        self.needs_render = true;
    }

    fn update(&mut self, cx: &mut Services<'_>, now_ms: u64) -> Option<Transition> {
        if self.needs_render {
            self.render(cx);
        }

        while let Some(event) = cx.input.pop() {
            self.last_activity = now_ms;
            match event {
                InputEvent::Rotate(delta) => {
                    let len = self.items.len() as i32;
                    self.selected =
                        (self.selected as i32 + delta).rem_euclid(len) as usize;
                    self.render(cx);
                }
                InputEvent::Press => {
                    let index = self.selected.checked_sub(1);
                    cx.catalog.set_last_index(index);
                    let project_id =
                        index.map(|_| self.items[self.selected].id.clone());
                    cx.display.play(Overlay::TimerStart);
                    return Some(Transition::with(
                        StateId::Timer,
                        Handoff {
                            duration_min: Some(self.duration_min),
                            elapsed_secs: Some(0),
                            project_id,
                        },
                    ));
                }
                InputEvent::DoublePress => {
                    return Some(Transition::to(StateId::Idle));
                }
                InputEvent::LongPress => {}
            }
        }

        if now_ms.saturating_sub(self.last_activity) >= PROJECT_SELECT_TIMEOUT_MS {
            return Some(Transition::to(StateId::Idle));
        }
        None
    }

    fn exit(&mut self, cx: &mut Services<'_>) {
        cx.leds.off();
    }
}
