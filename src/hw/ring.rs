//! WS2812 ring writer over RP2040 PIO.

use crate::config::RING_LEDS;
use crate::led::Frame;
use embassy_rp::pio::{Common, Instance, StateMachine};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::Peri;

/// The 16-pixel ring on its PIO state machine.
pub struct Ring<'d, P: Instance, const S: usize> {
    ws: PioWs2812<'d, P, S, RING_LEDS>,
}

impl<'d, P: Instance, const S: usize> Ring<'d, P, S> {
    pub fn new(
        common: &mut Common<'d, P>,
        sm: StateMachine<'d, P, S>,
        dma: Peri<'d, impl embassy_rp::dma::Channel>,
        pin: Peri<'d, impl embassy_rp::pio::PioPin>,
    ) -> Self {
        let program = PioWs2812Program::new(common);
        Self {
            ws: PioWs2812::new(common, sm, dma, pin, &program),
        }
    }

    /// Push one frame out to the ring; completes when the DMA is done.
    pub async fn write(&mut self, frame: &Frame) {
        self.ws.write(frame).await;
    }
}
