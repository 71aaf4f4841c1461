//! Display sink interface.
//!
//! The session core draws by name: one method per screen plus transient
//! full-screen overlays. Rendering itself is a collaborator concern - the
//! embedded implementation in `hw/oled.rs` draws text screens on the
//! SSD1306, and the test suites substitute a recording implementation.

use crate::store::Project;

/// Transient full-screen animations. A driver may block normal screen
/// drawing until the overlay finishes; the core keeps calling the
/// regular draw method each tick regardless.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Overlay {
    /// Checkmark after saving an adjusted duration.
    Confirm,
    /// Cross after cancelling a flow.
    Cancel,
    /// Factory-reset warning.
    FactoryReset,
    /// Wi-Fi provisioning completed.
    Connected,
    TimerStart,
    TimerPause,
    TimerResume,
    TimerDone,
}

/// One draw call per named screen; all stateless per call.
pub trait DisplayDriver {
    fn draw_splash(&mut self);

    /// Home screen: stored duration and Wi-Fi indicator.
    fn draw_idle(&mut self, duration_min: u16, wifi_connected: bool);

    /// Duration editor.
    fn draw_adjust(&mut self, duration_min: u16, wifi_connected: bool);

    /// Project picker; `items` always starts with the synthetic
    /// "No Project" entry.
    fn draw_project_select(&mut self, items: &[Project], selected: usize);

    /// Running timer. `seconds` is remaining time counting down, or
    /// elapsed time when `count_up` is set (indeterminate mode).
    fn draw_timer(&mut self, seconds: u32, count_up: bool);

    /// Paused session with remaining seconds.
    fn draw_paused(&mut self, remaining_secs: u32);

    /// Completed session summary.
    fn draw_done(&mut self, elapsed_secs: u32, duration_min: u16);

    /// Factory-reset chooser; `reset_selected` marks RESET over CANCEL.
    fn draw_reset(&mut self, reset_selected: bool);

    /// Provisioning instructions.
    fn draw_provision(&mut self);

    /// Blank the screen.
    fn clear(&mut self);

    /// Kick off a transient overlay animation.
    fn play(&mut self, overlay: Overlay);
}
