//! Focus Dial firmware entry for the Raspberry Pi Pico W.
//!
//! Wiring (see `config.rs`): encoder on GPIO 14/15 with its push button
//! on GPIO 13, WS2812 ring data on GPIO 16, SSD1306 on I2C0 (SDA GPIO 4,
//! SCL GPIO 5). The CYW43 radio uses the standard Pico W pins.
//!
//! The CYW43 firmware blobs are not vendored; drop `43439A0.bin` and
//! `43439A0_clm.bin` from the embassy repository into `firmware/`.

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_net::StackResources;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{DMA_CH0, FLASH, PIO0, PIO1};
use embassy_rp::pio::{self, Pio};
use embassy_time::Ticker;
use panic_probe as _;
use static_cell::StaticCell;

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use focus_dial::fsm::Services;
use focus_dial::hw::buttons::{button_task, encoder_task, InputChannel};
use focus_dial::hw::net::{connection_task, webhook_task, NetState};
use focus_dial::hw::oled::Oled;
use focus_dial::hw::ring::Ring;
use focus_dial::hw::{now_ms, McuReset};
use focus_dial::input::InputQueue;
use focus_dial::led::LedPatternEngine;
use focus_dial::store::ProjectCatalog;
use focus_dial::StateMachine;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => pio::InterruptHandler<PIO0>;
    PIO1_IRQ_0 => pio::InterruptHandler<PIO1>;
});

/// Pico W flash part size.
const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Session tick period; ~30 fps keeps the LED animations smooth.
const TICK_MS: u64 = 33;

static CYW43_STATE: StaticCell<cyw43::State> = StaticCell::new();
static NET_RESOURCES: StaticCell<StackResources<8>> = StaticCell::new();
static NET_STATE: NetState = NetState::new();
static INPUT_EVENTS: InputChannel = InputChannel::new();

#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_stack_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Focus Dial starting");

    // CYW43 radio bring-up.
    let fw = include_bytes!("../firmware/43439A0.bin");
    let clm = include_bytes!("../firmware/43439A0_clm.bin");
    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio0 = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio0.common,
        pio0.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio0.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );
    let state = CYW43_STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    unwrap!(spawner.spawn(cyw43_task(runner)));
    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let seed = u64::from_le_bytes(core::array::from_fn(|_| {
        embassy_rp::clocks::RoscRng::next_u8()
    }));
    let (stack, net_runner) = embassy_net::new(
        net_device,
        embassy_net::Config::dhcpv4(Default::default()),
        NET_RESOURCES.init(StackResources::new()),
        seed,
    );
    unwrap!(spawner.spawn(net_stack_task(net_runner)));
    unwrap!(spawner.spawn(connection_task(&NET_STATE, control, stack)));
    unwrap!(spawner.spawn(webhook_task(&NET_STATE, stack)));

    // Input tasks.
    unwrap!(spawner.spawn(button_task(p.PIN_13.into(), INPUT_EVENTS.sender())));
    unwrap!(spawner.spawn(encoder_task(
        p.PIN_14.into(),
        p.PIN_15.into(),
        INPUT_EVENTS.sender()
    )));

    // Display, ring, storage.
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let mut display = Oled::new(i2c);

    let mut pio1 = Pio::new(p.PIO1, Irqs);
    let mut ring = Ring::new(&mut pio1.common, pio1.sm0, p.DMA_CH1, p.PIN_16);

    let mut flash = Flash::<FLASH, Async, FLASH_SIZE>::new(p.FLASH, p.DMA_CH2);
    let mut catalog = ProjectCatalog::new();
    catalog.load_from_flash(&mut flash).await;

    let mut input = InputQueue::new();
    let mut leds = LedPatternEngine::new();
    let mut net = NET_STATE.handle();
    let mut system = McuReset;
    let mut machine = StateMachine::new();

    machine.begin(
        &mut Services {
            input: &mut input,
            display: &mut display,
            leds: &mut leds,
            net: &mut net,
            catalog: &mut catalog,
            system: &mut system,
        },
        now_ms(),
    );

    let mut ticker = Ticker::every(embassy_time::Duration::from_millis(TICK_MS));
    loop {
        ticker.next().await;
        let now = now_ms();

        while let Ok(event) = INPUT_EVENTS.try_receive() {
            input.push(event);
        }

        let entered = machine.update(
            &mut Services {
                input: &mut input,
                display: &mut display,
                leds: &mut leds,
                net: &mut net,
                catalog: &mut catalog,
                system: &mut system,
            },
            now,
        );
        if let Some(state) = entered {
            info!("State -> {}", state);
        }

        ring.write(&leds.tick(now)).await;

        // Persist settings changes as they happen; the write is rare
        // and short.
        if catalog.is_dirty() {
            catalog.save_to_flash(&mut flash).await;
        }
    }
}
