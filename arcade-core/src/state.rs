//! Device state: axis positions and button masks, plus the mutators the
//! control loop drives.

use core::ops::{BitOr, BitOrAssign};

use crate::panel::{ButtonMap, ButtonTarget, PanelSnapshot};
use crate::report::JoystickReport;

/// Report byte 4: the hat nibble and buttons 1-4.
///
/// Bit positions follow the report descriptor. The low nibble is the hat
/// switch field, so [`Buttons::HAT_NULL`] (all four bits set) reads as
/// "hat centered" on the host.
///
/// # Example
///
/// ```
/// use arcade_core::Buttons;
///
/// let buttons = Buttons::HAT_NULL | Buttons::BUTTON_1;
/// assert!(buttons.contains(Buttons::BUTTON_1));
/// assert!(!buttons.contains(Buttons::BUTTON_2));
/// assert_eq!(buttons.raw(), 0x1F);
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Buttons(pub u8);

impl Buttons {
    /// Hat switch null state (no direction).
    pub const HAT_NULL: Self = Self(0x0F);
    pub const BUTTON_1: Self = Self(1 << 4);
    pub const BUTTON_2: Self = Self(1 << 5);
    pub const BUTTON_3: Self = Self(1 << 6);
    pub const BUTTON_4: Self = Self(1 << 7);

    pub const NONE: Self = Self(0);

    /// Check if the given bit(s) are set.
    #[inline]
    #[must_use]
    pub const fn contains(self, mask: Buttons) -> bool {
        (self.0 & mask.0) == mask.0
    }

    /// Get the raw byte.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for Buttons {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl BitOr for Buttons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Report byte 5: buttons 5-10.
///
/// The top two bits belong to the vendor input field and stay clear.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartButtons(pub u8);

impl StartButtons {
    pub const BUTTON_5: Self = Self(1 << 0);
    pub const BUTTON_6: Self = Self(1 << 1);
    pub const BUTTON_7: Self = Self(1 << 2);
    pub const BUTTON_8: Self = Self(1 << 3);
    pub const BUTTON_9: Self = Self(1 << 4);
    pub const BUTTON_10: Self = Self(1 << 5);

    pub const MODE: Self = Self::BUTTON_9;
    pub const START: Self = Self::BUTTON_10;

    pub const NONE: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn contains(self, mask: StartButtons) -> bool {
        (self.0 & mask.0) == mask.0
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for StartButtons {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl BitOr for StartButtons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for StartButtons {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Current control snapshot of the joystick.
///
/// Directions map to full deflection only; presses are additive and are
/// cleared by [`DeviceState::reset`].
///
/// # Example
///
/// ```
/// use arcade_core::{Buttons, DeviceState};
///
/// let mut state = DeviceState::idle();
/// state.move_right();
/// state.press_button(Buttons::BUTTON_1);
/// assert_eq!(state.report().as_bytes(), [0x7F, 0x7F, 0xFF, 0x7F, 0x1F, 0x00, 0x00]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    pub axis_x: u8,
    pub axis_y: u8,
    pub buttons: Buttons,
    pub start_buttons: StartButtons,
}

impl DeviceState {
    pub const AXIS_MIN: u8 = 0x00;
    pub const AXIS_CENTER: u8 = 0x7F;
    pub const AXIS_MAX: u8 = 0xFF;

    /// Button byte at rest.
    pub const IDLE_BUTTONS: Buttons = Buttons::HAT_NULL;

    /// State with sticks centered and nothing pressed.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            axis_x: Self::AXIS_CENTER,
            axis_y: Self::AXIS_CENTER,
            buttons: Self::IDLE_BUTTONS,
            start_buttons: StartButtons::NONE,
        }
    }

    /// Restore every field to its idle value.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::idle();
    }

    #[inline]
    pub fn move_up(&mut self) {
        self.axis_y = Self::AXIS_MIN;
    }

    #[inline]
    pub fn move_down(&mut self) {
        self.axis_y = Self::AXIS_MAX;
    }

    #[inline]
    pub fn move_left(&mut self) {
        self.axis_x = Self::AXIS_MIN;
    }

    #[inline]
    pub fn move_right(&mut self) {
        self.axis_x = Self::AXIS_MAX;
    }

    /// OR `mask` into the button byte. Never clears bits.
    #[inline]
    pub fn press_button(&mut self, mask: Buttons) {
        self.buttons |= mask;
    }

    /// OR `mask` into the start/vendor byte. Never clears bits.
    #[inline]
    pub fn press_start(&mut self, mask: StartButtons) {
        self.start_buttons |= mask;
    }

    /// Apply a switch snapshot on top of the current state.
    ///
    /// Directions go in the order up, down, left, right, so when opposing
    /// switches are both closed the later one (down, right) wins.
    pub fn apply(&mut self, snapshot: &PanelSnapshot, map: &ButtonMap) {
        if snapshot.up {
            self.move_up();
        }
        if snapshot.down {
            self.move_down();
        }
        if snapshot.left {
            self.move_left();
        }
        if snapshot.right {
            self.move_right();
        }

        for (closed, target) in snapshot.buttons.iter().zip(map.buttons.iter()) {
            if *closed {
                self.press(*target);
            }
        }
        if snapshot.start {
            self.press(map.start);
        }
        if snapshot.mode {
            self.press(map.mode);
        }
    }

    fn press(&mut self, target: ButtonTarget) {
        match target {
            ButtonTarget::Button(mask) => self.press_button(mask),
            ButtonTarget::Start(mask) => self.press_start(mask),
            ButtonTarget::Unmapped => {}
        }
    }

    /// Snapshot the state as an input report.
    #[inline]
    #[must_use]
    pub fn report(&self) -> JoystickReport {
        JoystickReport::from(self)
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::idle()
    }
}
