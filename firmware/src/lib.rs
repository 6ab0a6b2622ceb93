//! Arcade panel to USB HID joystick converter for RP2040.
//!
//! This crate provides the embedded side of the converter: it samples the
//! arcade switches over GPIO and sends them to the host as a USB HID
//! joystick, using the descriptor and report encoding from [`arcade_core`].
//!
//! # Hardware Configuration
//!
//! All switches are wired between the GPIO and ground (active-low, internal
//! pull-ups enabled).
//!
//! | Function     | GPIO  | Description |
//! |--------------|-------|-------------|
//! | Up/Down      | 2, 3  | Joystick vertical |
//! | Left/Right   | 4, 5  | Joystick horizontal |
//! | A, B, C      | 6-8   | Top row buttons |
//! | X, Y, Z      | 9-11  | Bottom row buttons |
//! | L, R         | 12-13 | Extra buttons |
//! | Start        | 14    | Start button |
//! | Mode         | 15    | Mode/select button |
//! | LED          | 25    | On-board LED (host feedback bit 0) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with two tasks:
//!
//! - **USB Task**: Runs the USB device stack and the HID OUT reader
//! - **Control Task**: Samples the panel every [`config::POLL_MS`] ms and
//!   sends a report whenever the sample changes
//!
//! The control task is the only owner of the [`ArcadeJoystick`], so the
//! device state needs no locking. Host feedback reaches it through an
//! Embassy [`Signal`](embassy_sync::signal::Signal) with "latest value wins"
//! semantics.
//!
//! # Modules
//!
//! - [`config`]: USB identity, packet sizes, polling period, button map
//! - [`usb_transport`]: embassy-usb registry and transport ([`UsbHidRegistry`], [`UsbHidTransport`])
//! - [`feedback`]: output report handler ([`FeedbackHandler`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//! - **`md-mini-ids`**: Enumerate with the console pad VID/PID
//!
//! # Re-exports
//!
//! This crate re-exports the public items of [`arcade_core`] for convenience,
//! so consumers only need to depend on this crate.

#![no_std]

// Ensure mutually exclusive panic handler features
#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features - they define conflicting panic handlers");

// Re-export core types for convenience
pub use arcade_core::{
    ArcadeJoystick, ButtonMap, ButtonTarget, Buttons, DescriptorRegistry, DeviceState,
    JoystickReport, PanelSnapshot, ReportTransport, StartButtons, SwitchPanel, TransportError,
    VendorOutput, REPORT_DESCRIPTOR, REPORT_ID,
};

pub mod config;
pub mod feedback;
pub mod usb_transport;

pub use feedback::{FeedbackHandler, FeedbackSignal};
pub use usb_transport::{FeedbackReader, UsbDriver, UsbHidRegistry, UsbHidTransport};
