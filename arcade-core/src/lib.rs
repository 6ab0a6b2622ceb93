//! Platform-agnostic arcade joystick: HID report descriptor, report
//! encoding, device state and transport traits.
//!
//! This crate has no platform-specific dependencies. It runs in embedded
//! `no_std` firmware and on the host for testing.
//!
//! # Overview
//!
//! - [`descriptor`]: the report descriptor ([`REPORT_DESCRIPTOR`]) and an item walker
//! - [`report`]: the 7-byte input report ([`JoystickReport`])
//! - [`state`]: control state and mutators ([`DeviceState`], [`Buttons`], [`StartButtons`])
//! - [`panel`]: switch snapshots, button mapping and the pin reader ([`SwitchPanel`])
//! - [`feedback`]: host-written vendor output ([`VendorOutput`])
//! - [`transport`]: registration/send seams ([`DescriptorRegistry`], [`ReportTransport`])
//! - [`joystick`]: state plus transport ([`ArcadeJoystick`])
//!
//! # Wire Format
//!
//! Report ID `0x01`, carried by the transport framing, then:
//!
//! ```text
//! [0x7F, 0x7F, x, y, buttons, start_buttons, 0x00]
//! ```
//!
//! The descriptor declares exactly these 56 input bits; a mismatch fails
//! to compile.
//!
//! # Example
//!
//! ```rust
//! use arcade_core::{DeviceState, StartButtons};
//!
//! let mut state = DeviceState::idle();
//! state.move_up();
//! state.move_down();
//! state.press_start(StartButtons::START);
//!
//! // Last vertical move wins
//! assert_eq!(state.axis_y, 255);
//! assert_eq!(state.report().as_bytes(), [0x7F, 0x7F, 0x7F, 0xFF, 0x0F, 0x20, 0x00]);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod descriptor;
pub mod feedback;
pub mod joystick;
pub mod panel;
pub mod report;
pub mod state;
pub mod transport;

// Re-export main types at crate root
pub use descriptor::{
    fields, input_report_bits, output_report_bits, DescriptorError, FieldKind, ReportField,
    INPUT_REPORT_BITS, OUTPUT_REPORT_BITS, REPORT_DESCRIPTOR, REPORT_ID,
};
pub use feedback::{FeedbackError, VendorOutput};
pub use joystick::ArcadeJoystick;
pub use panel::{ButtonMap, ButtonTarget, PanelSnapshot, SwitchPanel, FACE_BUTTONS};
pub use report::JoystickReport;
pub use state::{Buttons, DeviceState, StartButtons};
pub use transport::{
    frame_report, DescriptorRegistry, ReportTransport, TransportError, REPORT_FRAME_SIZE,
};
