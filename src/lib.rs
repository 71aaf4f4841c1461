//! Focus Dial — session core.
//!
//! A rotary-dial focus timer: the state machine in [`fsm`] drives the
//! whole device, talking to its display, LED ring, network and storage
//! collaborators through the trait seams in [`display`], [`net`] and
//! [`store`]. Everything here is `no_std` and free of hardware types, so
//! the complete session logic runs on the host under `cargo test`.
//!
//! The embedded side (Raspberry Pi Pico W) lives in `main.rs` and the
//! `hw` module behind the `embedded` feature; it implements the
//! collaborator traits and pumps [`fsm::StateMachine::update`] from the
//! tick loop.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod display;
pub mod error;
pub mod fsm;
pub mod input;
pub mod led;
pub mod net;
pub mod store;

#[cfg(feature = "embedded")]
pub mod hw;

pub use error::Error;
pub use fsm::{Handoff, Services, StateId, StateMachine, SystemControl, Transition};
