//! Recording mock collaborators shared by the state unit tests.

use super::{Services, SystemControl};
use crate::display::{DisplayDriver, Overlay};
use crate::input::InputQueue;
use crate::led::LedPatternEngine;
use crate::net::{NetworkService, WebhookAction};
use crate::store::{Project, ProjectCatalog};

/// The last full screen a [`RecordingDisplay`] was asked to draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    Splash,
    Idle { duration_min: u16, wifi: bool },
    Adjust { duration_min: u16 },
    ProjectSelect { names: Vec<String>, selected: usize },
    Timer { seconds: u32, count_up: bool },
    Paused { remaining_secs: u32 },
    Done { elapsed_secs: u32, duration_min: u16 },
    Reset { reset_selected: bool },
    Provision,
    Cleared,
}

#[derive(Default)]
pub(crate) struct RecordingDisplay {
    pub last: Option<Screen>,
    pub overlays: Vec<Overlay>,
    pub splashes: u32,
}

impl DisplayDriver for RecordingDisplay {
    fn draw_splash(&mut self) {
        self.splashes += 1;
        self.last = Some(Screen::Splash);
    }

    fn draw_idle(&mut self, duration_min: u16, wifi_connected: bool) {
        self.last = Some(Screen::Idle {
            duration_min,
            wifi: wifi_connected,
        });
    }

    fn draw_adjust(&mut self, duration_min: u16, _wifi_connected: bool) {
        self.last = Some(Screen::Adjust { duration_min });
    }

    fn draw_project_select(&mut self, items: &[Project], selected: usize) {
        self.last = Some(Screen::ProjectSelect {
            names: items.iter().map(|p| p.name.as_str().to_owned()).collect(),
            selected,
        });
    }

    fn draw_timer(&mut self, seconds: u32, count_up: bool) {
        self.last = Some(Screen::Timer { seconds, count_up });
    }

    fn draw_paused(&mut self, remaining_secs: u32) {
        self.last = Some(Screen::Paused { remaining_secs });
    }

    fn draw_done(&mut self, elapsed_secs: u32, duration_min: u16) {
        self.last = Some(Screen::Done {
            elapsed_secs,
            duration_min,
        });
    }

    fn draw_reset(&mut self, reset_selected: bool) {
        self.last = Some(Screen::Reset { reset_selected });
    }

    fn draw_provision(&mut self) {
        self.last = Some(Screen::Provision);
    }

    fn clear(&mut self) {
        self.last = Some(Screen::Cleared);
    }

    fn play(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }
}

#[derive(Default)]
pub(crate) struct MockNet {
    pub provisioned: bool,
    pub connected: bool,
    pub provisioning: bool,
    pub credentials_reset: bool,
    pub webhooks: Vec<(WebhookAction, u16, u32)>,
}

impl NetworkService for MockNet {
    fn wifi_provisioned(&self) -> bool {
        self.provisioned
    }

    fn wifi_connected(&self) -> bool {
        self.connected
    }

    fn start_provisioning(&mut self) {
        self.provisioning = true;
    }

    fn stop_provisioning(&mut self) {
        self.provisioning = false;
    }

    fn reset_credentials(&mut self) {
        self.provisioned = false;
        self.connected = false;
        self.credentials_reset = true;
    }

    fn send_webhook(&mut self, action: WebhookAction, duration_min: u16, elapsed_secs: u32) {
        self.webhooks.push((action, duration_min, elapsed_secs));
    }
}

#[derive(Default)]
pub(crate) struct MockSystem {
    pub reboots: u32,
}

impl SystemControl for MockSystem {
    fn reboot(&mut self) {
        self.reboots += 1;
    }
}

/// Owns one of every collaborator and lends them out as a [`Services`]
/// registry.
pub(crate) struct Fixture {
    pub input: InputQueue,
    pub display: RecordingDisplay,
    pub leds: LedPatternEngine,
    pub net: MockNet,
    pub catalog: ProjectCatalog,
    pub system: MockSystem,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            input: InputQueue::new(),
            display: RecordingDisplay::default(),
            leds: LedPatternEngine::new(),
            net: MockNet::default(),
            catalog: ProjectCatalog::new(),
            system: MockSystem::default(),
        }
    }

    pub fn services(&mut self) -> Services<'_> {
        Services {
            input: &mut self.input,
            display: &mut self.display,
            leds: &mut self.leds,
            net: &mut self.net,
            catalog: &mut self.catalog,
            system: &mut self.system,
        }
    }
}
