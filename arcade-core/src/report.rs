//! Joystick input report: the 7-byte body sent under report ID 1.

use crate::state::DeviceState;

/// Value of the two reserved placeholder bytes.
pub const RESERVED: u8 = 0x7F;

/// Joystick input report.
///
/// This matches the input fields of [`REPORT_DESCRIPTOR`](crate::REPORT_DESCRIPTOR).
/// The report ID is not part of the body; the transport adds it.
///
/// ```text
/// [0x7F, 0x7F, x, y, buttons, start_buttons, 0x00]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickReport {
    /// X axis (0 = left, 255 = right)
    pub axis_x: u8,
    /// Y axis (0 = up, 255 = down)
    pub axis_y: u8,
    /// Hat nibble plus buttons 1-4
    pub buttons: u8,
    /// Buttons 5-10 plus vendor bits 1-2
    pub start_buttons: u8,
}

impl JoystickReport {
    /// Size of the report body in bytes.
    pub const SIZE: usize = 7;

    pub const OFFSET_X: usize = 2;
    pub const OFFSET_Y: usize = 3;
    pub const OFFSET_BUTTONS: usize = 4;
    pub const OFFSET_START: usize = 5;

    /// Report sent while no control is active.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            axis_x: DeviceState::AXIS_CENTER,
            axis_y: DeviceState::AXIS_CENTER,
            buttons: DeviceState::IDLE_BUTTONS.raw(),
            start_buttons: 0,
        }
    }

    /// Convert the report to bytes.
    ///
    /// Bytes 0 and 1 are the reserved placeholders and byte 6 stays zero.
    #[must_use]
    pub fn as_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0] = RESERVED;
        bytes[1] = RESERVED;
        bytes[Self::OFFSET_X] = self.axis_x;
        bytes[Self::OFFSET_Y] = self.axis_y;
        bytes[Self::OFFSET_BUTTONS] = self.buttons;
        bytes[Self::OFFSET_START] = self.start_buttons;
        bytes
    }
}

impl Default for JoystickReport {
    fn default() -> Self {
        Self::idle()
    }
}

impl From<&DeviceState> for JoystickReport {
    fn from(state: &DeviceState) -> Self {
        Self {
            axis_x: state.axis_x,
            axis_y: state.axis_y,
            buttons: state.buttons.raw(),
            start_buttons: state.start_buttons.raw(),
        }
    }
}
