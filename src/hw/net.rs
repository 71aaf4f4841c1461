//! CYW43-backed network service.
//!
//! Wi-Fi credentials are baked in at build time (`WIFI_SSID` /
//! `WIFI_PASSWORD` environment variables); the captive-portal pairing
//! flow is out of scope here, so "provisioned" means credentials were
//! present at build. Webhook notifications are queued on a channel and
//! POSTed by a background task - the session core never waits on the
//! network.

use core::fmt::Write as _;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::{WEBHOOK_HOST, WEBHOOK_PATH, WEBHOOK_PORT, WEBHOOK_QUEUE_DEPTH};
use crate::net::{NetworkService, WebhookAction};
use defmt::{info, warn};
use embassy_net::tcp::TcpSocket;
use embassy_net::{Ipv4Address, Stack};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;
use heapless::String;

const WIFI_SSID: Option<&str> = option_env!("WIFI_SSID");
const WIFI_PASSWORD: Option<&str> = option_env!("WIFI_PASSWORD");

struct WebhookRequest {
    action: WebhookAction,
    duration_min: u16,
    elapsed_secs: u32,
}

/// Shared state between the session core's service handle and the
/// network tasks. Lives in a `static`.
pub struct NetState {
    provisioned: AtomicBool,
    connected: AtomicBool,
    provisioning: AtomicBool,
    queue: Channel<CriticalSectionRawMutex, WebhookRequest, WEBHOOK_QUEUE_DEPTH>,
}

impl NetState {
    pub const fn new() -> Self {
        Self {
            provisioned: AtomicBool::new(WIFI_SSID.is_some()),
            connected: AtomicBool::new(false),
            provisioning: AtomicBool::new(false),
            queue: Channel::new(),
        }
    }

    pub fn handle(&'static self) -> NetHandle {
        NetHandle { state: self }
    }
}

/// The [`NetworkService`] implementation handed to the session core.
pub struct NetHandle {
    state: &'static NetState,
}

impl NetworkService for NetHandle {
    fn wifi_provisioned(&self) -> bool {
        self.state.provisioned.load(Ordering::Relaxed)
    }

    fn wifi_connected(&self) -> bool {
        self.state.connected.load(Ordering::Relaxed)
    }

    fn start_provisioning(&mut self) {
        info!("Provisioning requested");
        self.state.provisioning.store(true, Ordering::Relaxed);
    }

    fn stop_provisioning(&mut self) {
        self.state.provisioning.store(false, Ordering::Relaxed);
    }

    fn reset_credentials(&mut self) {
        warn!("Wi-Fi credentials reset; re-provision to reconnect");
        self.state.provisioned.store(false, Ordering::Relaxed);
        self.state.connected.store(false, Ordering::Relaxed);
    }

    fn send_webhook(&mut self, action: WebhookAction, duration_min: u16, elapsed_secs: u32) {
        if !self.wifi_connected() {
            warn!("Webhook {} dropped: offline", action);
            return;
        }
        let request = WebhookRequest {
            action,
            duration_min,
            elapsed_secs,
        };
        if self.state.queue.try_send(request).is_err() {
            warn!("Webhook {} dropped: queue full", action);
        }
    }
}

/// Keep the Wi-Fi client association alive.
#[embassy_executor::task]
pub async fn connection_task(
    state: &'static NetState,
    mut control: cyw43::Control<'static>,
    stack: Stack<'static>,
) -> ! {
    let (Some(ssid), Some(password)) = (WIFI_SSID, WIFI_PASSWORD) else {
        warn!("No Wi-Fi credentials baked into this build");
        loop {
            Timer::after_secs(3_600).await;
        }
    };

    loop {
        if !state.provisioned.load(Ordering::Relaxed) {
            // Wiped by a factory reset; nothing to join until the next
            // provisioning cycle.
            Timer::after_secs(1).await;
            continue;
        }

        match control
            .join(ssid, cyw43::JoinOptions::new(password.as_bytes()))
            .await
        {
            Ok(()) => {
                stack.wait_config_up().await;
                info!("Wi-Fi up");
                state.connected.store(true, Ordering::Relaxed);

                while stack.is_link_up() {
                    Timer::after_secs(5).await;
                }
                state.connected.store(false, Ordering::Relaxed);
                warn!("Wi-Fi link lost, rejoining");
            }
            Err(e) => {
                warn!("Wi-Fi join failed, status {}", e.status);
                Timer::after_secs(5).await;
            }
        }
    }
}

/// Drain the webhook queue, one HTTP POST per notification.
#[embassy_executor::task]
pub async fn webhook_task(state: &'static NetState, stack: Stack<'static>) -> ! {
    let mut rx_buf = [0u8; 512];
    let mut tx_buf = [0u8; 512];

    loop {
        let req = state.queue.receive().await;

        let action = match req.action {
            WebhookAction::Start => "start",
            WebhookAction::Stop => "stop",
        };
        let mut body: String<96> = String::new();
        let _ = write!(
            body,
            "{{\"action\":\"{}\",\"duration\":{},\"elapsed\":{}}}",
            action, req.duration_min, req.elapsed_secs
        );

        let [a, b, c, d] = WEBHOOK_HOST;
        let mut request: String<320> = String::new();
        let _ = write!(
            request,
            "POST {} HTTP/1.1\r\nHost: {}.{}.{}.{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            WEBHOOK_PATH, a, b, c, d, body.len(), body
        );

        let mut socket = TcpSocket::new(stack, &mut rx_buf, &mut tx_buf);
        socket.set_timeout(Some(Duration::from_secs(5)));
        match socket.connect((Ipv4Address::new(a, b, c, d), WEBHOOK_PORT)).await {
            Ok(()) => {
                if let Err(e) = socket.write_all(request.as_bytes()).await {
                    warn!("Webhook write failed: {:?}", e);
                } else {
                    info!("Webhook {} sent", action);
                }
                socket.close();
            }
            Err(e) => warn!("Webhook connect failed: {:?}", e),
        }
    }
}
