//! GPIO input tasks.
//!
//! The dial has one push button on the encoder shaft (active-low with
//! internal pull-up) and the encoder's two quadrature phases. Each task
//! feeds its pure decoder from `input.rs` and sends the resulting
//! [`InputEvent`]s over a channel; the main loop drains the channel into
//! the session core's queue.

use crate::config::{BUTTON_DEBOUNCE_MS, INPUT_QUEUE_DEPTH};
use crate::hw::now_ms;
use crate::input::{ButtonDecoder, EncoderDecoder, InputEvent};
use defmt::debug;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::Peri;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_time::{Duration, Timer};

/// Channel carrying decoded input events to the main loop.
pub type InputChannel = Channel<CriticalSectionRawMutex, InputEvent, INPUT_QUEUE_DEPTH>;
pub type InputSender = Sender<'static, CriticalSectionRawMutex, InputEvent, INPUT_QUEUE_DEPTH>;

/// Poll interval for the time-driven part of the press classifier.
const BUTTON_POLL: Duration = Duration::from_millis(10);

/// Sampling interval for the quadrature phases.
const ENCODER_POLL: Duration = Duration::from_millis(1);

/// Classify button edges into press / double press / long press.
#[embassy_executor::task]
pub async fn button_task(pin: Peri<'static, AnyPin>, tx: InputSender) -> ! {
    let mut btn = Input::new(pin, Pull::Up);
    let mut decoder = ButtonDecoder::new();

    loop {
        let event = match select(btn.wait_for_any_edge(), Timer::after(BUTTON_POLL)).await {
            Either::First(()) => {
                // Debounce: settle, then read the level.
                Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
                decoder.on_edge(btn.is_low(), now_ms())
            }
            Either::Second(()) => decoder.poll(now_ms()),
        };

        if let Some(event) = event {
            debug!("Button: {}", event);
            tx.send(event).await;
        }
    }
}

/// Decode the quadrature phases into rotation detents.
#[embassy_executor::task]
pub async fn encoder_task(
    pin_a: Peri<'static, AnyPin>,
    pin_b: Peri<'static, AnyPin>,
    tx: InputSender,
) -> ! {
    let a = Input::new(pin_a, Pull::Up);
    let b = Input::new(pin_b, Pull::Up);
    let mut decoder = EncoderDecoder::new(a.is_high(), b.is_high());

    loop {
        Timer::after(ENCODER_POLL).await;
        if let Some(delta) = decoder.step(a.is_high(), b.is_high()) {
            debug!("Encoder: {}", delta);
            tx.send(InputEvent::Rotate(delta)).await;
        }
    }
}
