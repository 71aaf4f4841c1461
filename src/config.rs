//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and session
//! defaults live here so they can be tuned in one place.

// Session timer

/// Default focus duration (minutes) when nothing is stored in flash.
pub const DEFAULT_TIMER_MIN: u16 = 25;

/// Minimum adjustable focus duration (minutes).
pub const MIN_TIMER_MIN: u16 = 5;

/// Maximum adjustable focus duration (minutes, 4 hours).
pub const MAX_TIMER_MIN: u16 = 240;

/// Minutes added/removed per encoder detent in the adjust screen.
pub const ADJUST_STEP_MIN: u16 = 5;

/// A stored duration of zero means "indeterminate": the timer counts
/// up with no fixed end instead of counting down.
pub const INDETERMINATE_MIN: u16 = 0;

// State timeouts

/// How long the splash screen is shown before leaving Startup (ms).
pub const SPLASH_DURATION_MS: u64 = 2_000;

/// Inactivity timeout for the adjust and done screens (ms).
pub const CHANGE_TIMEOUT_MS: u64 = 5_000;

/// Inactivity timeout in the project picker (ms).
pub const PROJECT_SELECT_TIMEOUT_MS: u64 = 30_000;

/// Idle inactivity before the display and LEDs go to sleep (ms).
pub const SLEEP_TIMEOUT_MS: u64 = 5 * 60 * 1_000;

/// How long a session may stay paused before it is cancelled (ms).
pub const PAUSE_TIMEOUT_MS: u64 = 10 * 60 * 1_000;

/// Grace period between confirming a factory reset and rebooting (ms).
pub const RESET_REBOOT_GRACE_MS: u64 = 1_000;

// Input timing

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Window after a release in which a second press counts as a
/// double press (ms).
pub const DOUBLE_PRESS_WINDOW_MS: u64 = 300;

/// Hold time after which a press is reported as a long press (ms).
pub const LONG_PRESS_MS: u64 = 800;

/// Capacity of the pending input-event queue.
pub const INPUT_QUEUE_DEPTH: usize = 8;

// LED ring

/// Number of WS2812 pixels on the ring.
pub const RING_LEDS: usize = 16;

/// Global brightness cap, 0-255.
pub const LED_BRIGHTNESS: u8 = 100;

/// Milliseconds per spinner step.
pub const SPINNER_STEP_MS: u64 = 80;

/// Milliseconds per radar-sweep step.
pub const RADAR_STEP_MS: u64 = 90;

// LED colors (0xRRGGBB)

pub const BLUE: u32 = 0x0000FF;
pub const AMBER: u32 = 0xFFBF00;
pub const RED: u32 = 0xFF0000;
pub const GREEN: u32 = 0x00FF00;
pub const YELLOW: u32 = 0xFFFF00;
pub const MAGENTA: u32 = 0xFF00FF;
pub const TEAL: u32 = 0x008080;
pub const WHITE: u32 = 0xFFFFFF;

// Project catalog

/// Maximum number of projects tracked in the catalog.
pub const MAX_PROJECTS: usize = 16;

/// Maximum project name length (bytes, truncated beyond this).
pub const PROJECT_NAME_LEN: usize = 24;

/// Maximum project id length (bytes).
pub const PROJECT_ID_LEN: usize = 16;

/// Label shown for the synthetic "no project" entry in the picker.
pub const NO_PROJECT_LABEL: &str = "No Project";

// GPIO pin assignments (Pico W defaults)
//
// These are logical names; actual `embassy_rp::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Encoder A     → GPIO 14
//   Encoder B     → GPIO 15
//   Button        → GPIO 13
//   WS2812 data   → GPIO 16
//   I²C SDA       → GPIO 4
//   I²C SCL       → GPIO 5

/// OLED I²C address.
pub const OLED_ADDR: u8 = 0x3C;

// Flash storage (2 MB part on the Pico W; 4 KB sectors)

/// Flash page index where catalog/settings storage starts.
pub const STORAGE_FLASH_PAGE_START: u32 = 440;

/// Number of flash pages reserved for catalog/settings storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

// Webhook

/// TCP port the webhook endpoint listens on.
pub const WEBHOOK_PORT: u16 = 80;

/// IPv4 address of the webhook endpoint. Point at your automation host.
pub const WEBHOOK_HOST: [u8; 4] = [192, 168, 1, 50];

/// Request path for webhook notifications.
pub const WEBHOOK_PATH: &str = "/focus-dial";

/// Capacity of the outgoing webhook queue.
pub const WEBHOOK_QUEUE_DEPTH: usize = 4;
