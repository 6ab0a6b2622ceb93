//! Build-time device configuration.

use arcade_core::ButtonMap;

/// USB vendor/product IDs.
///
/// The console pad IDs make the Mega Drive Mini accept the converter as
/// its own controller.
#[cfg(feature = "md-mini-ids")]
pub const USB_VID_PID: (u16, u16) = (0x0CA3, 0x0024);

/// USB vendor/product IDs (pid.codes test VID/PID).
#[cfg(not(feature = "md-mini-ids"))]
pub const USB_VID_PID: (u16, u16) = (0x1209, 0x0001);

pub const USB_MANUFACTURER: &str = "Rust Arcade";
pub const USB_PRODUCT: &str = "Arcade-to-USB Joystick";
pub const USB_SERIAL: &str = "001";
pub const USB_MAX_POWER_MA: u16 = 100;

/// Interrupt endpoint polling interval, also the control loop period.
pub const POLL_MS: u8 = 1;

/// IN endpoint packet: report ID plus the 7-byte body.
pub const IN_PACKET_SIZE: usize = 8;

/// OUT endpoint packet: report ID plus the 1-byte vendor output.
pub const OUT_PACKET_SIZE: usize = 2;

/// Panel-to-report mapping used by the control loop.
pub const BUTTON_MAP: ButtonMap = ButtonMap::DEFAULT;
