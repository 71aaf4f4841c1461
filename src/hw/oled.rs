//! SSD1306 screen driver: text screens for every session state.
//!
//! Pixel art is deliberately plain - a title line, a big middle line and
//! a footer, drawn with the stock 6x10 font. Overlays are rendered as a
//! single full screen; the next regular draw replaces them.

use core::fmt::Write as _;

use crate::config::{INDETERMINATE_MIN, NO_PROJECT_LABEL, OLED_ADDR, PROJECT_NAME_LEN};
use crate::display::{DisplayDriver, Overlay};
use crate::store::Project;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_9X18_BOLD};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Text};
use heapless::String;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

/// Concrete display type, generic over the HAL's I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Picker rows visible at once.
const PICKER_ROWS: usize = 4;

fn small() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

fn big() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_9X18_BOLD)
        .text_color(BinaryColor::On)
        .build()
}

/// "MM:SS", or "H:MM:SS" past the first hour.
fn fmt_clock(total_secs: u32) -> String<12> {
    let mut out = String::new();
    let h = total_secs / 3_600;
    let m = (total_secs / 60) % 60;
    let s = total_secs % 60;
    if h > 0 {
        let _ = write!(out, "{h}:{m:02}:{s:02}");
    } else {
        let _ = write!(out, "{m:02}:{s:02}");
    }
    out
}

pub struct Oled<I2C> {
    display: Display<I2C>,
}

impl<I2C> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the panel and blank it.
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, OLED_ADDR);
        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        let _ = display.init();
        display.clear_buffer();
        let _ = display.flush();
        Self { display }
    }

    fn screen(&mut self, title: &str, middle: &str, footer: &str) {
        self.display.clear_buffer();
        let _ = Text::new(title, Point::new(0, 10), small()).draw(&mut self.display);
        let _ = Text::with_alignment(
            middle,
            Point::new(64, 40),
            big(),
            Alignment::Center,
        )
        .draw(&mut self.display);
        let _ = Text::new(footer, Point::new(0, 62), small()).draw(&mut self.display);
        let _ = self.display.flush();
    }
}

impl<I2C> DisplayDriver for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn draw_splash(&mut self) {
        self.screen("", "FOCUS DIAL", "");
    }

    fn draw_idle(&mut self, duration_min: u16, wifi_connected: bool) {
        let mut middle: String<12> = String::new();
        if duration_min == INDETERMINATE_MIN {
            let _ = middle.push_str("--:--");
        } else {
            let _ = write!(middle, "{duration_min} min");
        }
        let wifi = if wifi_connected { "wifi" } else { "offline" };
        self.screen("Ready", &middle, wifi);
    }

    fn draw_adjust(&mut self, duration_min: u16, wifi_connected: bool) {
        let mut middle: String<12> = String::new();
        let _ = write!(middle, "{duration_min} min");
        let wifi = if wifi_connected { "wifi" } else { "offline" };
        self.screen("Set duration", &middle, wifi);
    }

    fn draw_project_select(&mut self, items: &[Project], selected: usize) {
        self.display.clear_buffer();
        let _ = Text::new("Project", Point::new(0, 10), small()).draw(&mut self.display);

        // Window the list around the selection.
        let first = selected.saturating_sub(PICKER_ROWS - 1);
        for (row, (i, project)) in items
            .iter()
            .enumerate()
            .skip(first)
            .take(PICKER_ROWS)
            .enumerate()
        {
            let mut line: String<{ PROJECT_NAME_LEN + 2 }> = String::new();
            let _ = line.push_str(if i == selected { "> " } else { "  " });
            let _ = line.push_str(if project.name.is_empty() {
                NO_PROJECT_LABEL
            } else {
                project.name.as_str()
            });
            let y = 24 + (row as i32 * 10);
            let _ = Text::new(&line, Point::new(0, y), small()).draw(&mut self.display);
        }
        let _ = self.display.flush();
    }

    fn draw_timer(&mut self, seconds: u32, count_up: bool) {
        let footer = if count_up { "counting up" } else { "remaining" };
        self.screen("Focus", &fmt_clock(seconds), footer);
    }

    fn draw_paused(&mut self, remaining_secs: u32) {
        self.screen("Paused", &fmt_clock(remaining_secs), "press to resume");
    }

    fn draw_done(&mut self, elapsed_secs: u32, duration_min: u16) {
        let mut footer: String<16> = String::new();
        if duration_min > 0 {
            let _ = write!(footer, "of {duration_min} min");
        }
        self.screen("Done", &fmt_clock(elapsed_secs), &footer);
    }

    fn draw_reset(&mut self, reset_selected: bool) {
        let (middle, footer) = if reset_selected {
            ("RESET", "press to wipe")
        } else {
            ("CANCEL", "press to go back")
        };
        self.screen("Factory reset?", middle, footer);
    }

    fn draw_provision(&mut self) {
        self.screen("Setup", "WIFI", "join Focus-Dial AP");
    }

    fn clear(&mut self) {
        self.display.clear_buffer();
        let _ = self.display.flush();
    }

    fn play(&mut self, overlay: Overlay) {
        let middle = match overlay {
            Overlay::Confirm => "SAVED",
            Overlay::Cancel => "CANCELLED",
            Overlay::FactoryReset => "WIPING",
            Overlay::Connected => "CONNECTED",
            Overlay::TimerStart => "GO",
            Overlay::TimerPause => "PAUSED",
            Overlay::TimerResume => "RESUME",
            Overlay::TimerDone => "TIME UP",
        };
        self.screen("", middle, "");
    }
}
