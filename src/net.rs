//! Network service interface.
//!
//! Wi-Fi provisioning state and webhook delivery are collaborator
//! concerns; the session core only queries status and fires
//! best-effort notifications. A failed or offline webhook never blocks
//! a state transition - the implementation queues and logs, the core
//! proceeds as if delivery succeeded.

/// Session actions reported to the configured webhook endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WebhookAction {
    /// A focus session started or resumed.
    Start,
    /// A focus session ended, paused out, or was cancelled.
    Stop,
}

/// Connectivity and webhook collaborator consumed by the session core.
pub trait NetworkService {
    /// Wi-Fi credentials are stored on the device.
    fn wifi_provisioned(&self) -> bool;

    /// The device currently holds a Wi-Fi connection.
    fn wifi_connected(&self) -> bool;

    /// Enter provisioning/AP mode so the user can hand over credentials.
    fn start_provisioning(&mut self);

    /// Leave provisioning mode; harmless when not provisioning.
    fn stop_provisioning(&mut self);

    /// Forget stored Wi-Fi credentials (factory reset).
    fn reset_credentials(&mut self);

    /// Queue a fire-and-forget webhook notification.
    fn send_webhook(&mut self, action: WebhookAction, duration_min: u16, elapsed_secs: u32);
}
