//! Arcade panel switches: snapshot, button mapping and pin reader.

use embedded_hal::digital::InputPin;

use crate::state::{Buttons, StartButtons};

/// Number of face buttons on the panel (A, B, C, X, Y, Z, L, R).
pub const FACE_BUTTONS: usize = 8;

/// State of every panel switch at one sampling instant.
///
/// `true` means the switch is closed (pressed).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Face buttons in A, B, C, X, Y, Z, L, R order
    pub buttons: [bool; FACE_BUTTONS],
    pub start: bool,
    pub mode: bool,
}

impl PanelSnapshot {
    /// Every switch open.
    #[must_use]
    pub const fn released() -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
            buttons: [false; FACE_BUTTONS],
            start: false,
            mode: false,
        }
    }
}

/// Where a panel switch lands in the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonTarget {
    /// OR into the button byte.
    Button(Buttons),
    /// OR into the start/vendor byte.
    Start(StartButtons),
    /// Switch is ignored.
    Unmapped,
}

/// Mapping from panel switches to report bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonMap {
    pub buttons: [ButtonTarget; FACE_BUTTONS],
    pub start: ButtonTarget,
    pub mode: ButtonTarget,
}

impl ButtonMap {
    /// Face buttons A-R on HID buttons 1-8, mode on 9, start on 10.
    pub const DEFAULT: Self = Self {
        buttons: [
            ButtonTarget::Button(Buttons::BUTTON_1),
            ButtonTarget::Button(Buttons::BUTTON_2),
            ButtonTarget::Button(Buttons::BUTTON_3),
            ButtonTarget::Button(Buttons::BUTTON_4),
            ButtonTarget::Start(StartButtons::BUTTON_5),
            ButtonTarget::Start(StartButtons::BUTTON_6),
            ButtonTarget::Start(StartButtons::BUTTON_7),
            ButtonTarget::Start(StartButtons::BUTTON_8),
        ],
        start: ButtonTarget::Start(StartButtons::START),
        mode: ButtonTarget::Start(StartButtons::MODE),
    };
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Panel switches wired to digital inputs.
///
/// Switches are active-low: a closed switch pulls its pin to ground
/// against the input pull-up.
pub struct SwitchPanel<P> {
    pub up: P,
    pub down: P,
    pub left: P,
    pub right: P,
    pub buttons: [P; FACE_BUTTONS],
    pub start: P,
    pub mode: P,
}

impl<P: InputPin> SwitchPanel<P> {
    /// Sample every switch once.
    pub fn read(&mut self) -> Result<PanelSnapshot, P::Error> {
        let mut buttons = [false; FACE_BUTTONS];
        for (closed, pin) in buttons.iter_mut().zip(self.buttons.iter_mut()) {
            *closed = pin.is_low()?;
        }

        Ok(PanelSnapshot {
            up: self.up.is_low()?,
            down: self.down.is_low()?,
            left: self.left.is_low()?,
            right: self.right.is_low()?,
            buttons,
            start: self.start.is_low()?,
            mode: self.mode.is_low()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{Error, ErrorKind, ErrorType};

    /// Pin with a fixed level.
    struct MockPin {
        low: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.low)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.low)
        }
    }

    fn panel(closed: &[usize]) -> SwitchPanel<MockPin> {
        // Index order: up, down, left, right, A..R, start, mode
        let pin = |i: usize| MockPin {
            low: closed.contains(&i),
        };
        SwitchPanel {
            up: pin(0),
            down: pin(1),
            left: pin(2),
            right: pin(3),
            buttons: core::array::from_fn(|b| pin(4 + b)),
            start: pin(12),
            mode: pin(13),
        }
    }

    #[test]
    fn test_all_open() {
        let snapshot = panel(&[]).read().unwrap();
        assert_eq!(snapshot, PanelSnapshot::released());
    }

    #[test]
    fn test_active_low() {
        let snapshot = panel(&[0, 3, 4, 11, 12]).read().unwrap();
        assert!(snapshot.up);
        assert!(!snapshot.down);
        assert!(!snapshot.left);
        assert!(snapshot.right);
        assert!(snapshot.buttons[0]);
        assert!(!snapshot.buttons[1]);
        assert!(snapshot.buttons[7]);
        assert!(snapshot.start);
        assert!(!snapshot.mode);
    }

    #[derive(Debug)]
    struct PinFault;

    impl Error for PinFault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct FaultyPin;

    impl ErrorType for FaultyPin {
        type Error = PinFault;
    }

    impl InputPin for FaultyPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(PinFault)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(PinFault)
        }
    }

    #[test]
    fn test_pin_error_propagates() {
        let mut panel = SwitchPanel {
            up: FaultyPin,
            down: FaultyPin,
            left: FaultyPin,
            right: FaultyPin,
            buttons: core::array::from_fn(|_| FaultyPin),
            start: FaultyPin,
            mode: FaultyPin,
        };
        assert!(panel.read().is_err());
    }

    #[test]
    fn test_default_map_targets() {
        let map = ButtonMap::default();
        assert_eq!(map.buttons[0], ButtonTarget::Button(Buttons::BUTTON_1));
        assert_eq!(map.buttons[3], ButtonTarget::Button(Buttons::BUTTON_4));
        assert_eq!(map.buttons[4], ButtonTarget::Start(StartButtons::BUTTON_5));
        assert_eq!(map.start, ButtonTarget::Start(StartButtons::START));
        assert_eq!(map.mode, ButtonTarget::Start(StartButtons::MODE));
    }
}
