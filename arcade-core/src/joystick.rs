//! ArcadeJoystick: device state bundled with its report transport.

use crate::descriptor::{REPORT_DESCRIPTOR, REPORT_ID};
use crate::panel::{ButtonMap, PanelSnapshot};
use crate::state::DeviceState;
use crate::transport::{DescriptorRegistry, ReportTransport, TransportError};

/// A joystick device: one [`DeviceState`] plus the transport its reports go to.
///
/// Created by [`ArcadeJoystick::initialize`], which registers the report
/// descriptor before anything can be sent. The control loop owns the value
/// and is the only context that mutates the state.
pub struct ArcadeJoystick<T> {
    state: DeviceState,
    transport: T,
}

impl<T: ReportTransport> ArcadeJoystick<T> {
    /// Register the report descriptor and start from the idle state.
    pub fn initialize<R>(registry: R) -> Self
    where
        R: DescriptorRegistry<Transport = T>,
    {
        let transport = registry.register_descriptor(REPORT_DESCRIPTOR);
        Self {
            state: DeviceState::idle(),
            transport,
        }
    }

    /// Current control state.
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Mutable access for the mutators (`move_up`, `press_button`, ...).
    pub fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    /// Serialize the current state and transmit it under [`REPORT_ID`].
    ///
    /// The transport's result is passed through untouched.
    pub async fn send_report(&mut self) -> Result<(), TransportError> {
        let report = self.state.report();
        self.transport
            .send_report(REPORT_ID, &report.as_bytes())
            .await
    }

    /// Run one control frame: reset, apply the snapshot, send.
    pub async fn update(
        &mut self,
        snapshot: &PanelSnapshot,
        map: &ButtonMap,
    ) -> Result<(), TransportError> {
        self.state.reset();
        self.state.apply(snapshot, map);
        self.send_report().await
    }

    /// Get a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Decompose into the state and the transport.
    pub fn into_parts(self) -> (DeviceState, T) {
        (self.state, self.transport)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::panel::FACE_BUTTONS;
    use crate::report::JoystickReport;
    use crate::state::{Buttons, StartButtons};
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use std::sync::{Arc, Mutex};
    use std::vec;
    use std::vec::Vec;

    type Sent = Arc<Mutex<Vec<(u8, Vec<u8>)>>>;

    // Registry that records the descriptor it was handed
    struct MockRegistry {
        registered: Arc<Mutex<Vec<&'static [u8]>>>,
        sent: Sent,
        fail_with: Option<TransportError>,
    }

    impl MockRegistry {
        fn new() -> Self {
            Self {
                registered: Arc::new(Mutex::new(Vec::new())),
                sent: Arc::new(Mutex::new(Vec::new())),
                fail_with: None,
            }
        }
    }

    impl DescriptorRegistry for MockRegistry {
        type Transport = MockTransport;

        fn register_descriptor(self, descriptor: &'static [u8]) -> MockTransport {
            self.registered.lock().unwrap().push(descriptor);
            MockTransport {
                sent: self.sent,
                fail_with: self.fail_with,
            }
        }
    }

    // Transport that records every report
    struct MockTransport {
        sent: Sent,
        fail_with: Option<TransportError>,
    }

    impl ReportTransport for MockTransport {
        fn send_report(
            &mut self,
            report_id: u8,
            body: &[u8],
        ) -> impl Future<Output = Result<(), TransportError>> {
            let result = match self.fail_with {
                Some(e) => Err(e),
                None => {
                    self.sent.lock().unwrap().push((report_id, body.to_vec()));
                    Ok(())
                }
            };
            core::future::ready(result)
        }

        fn is_ready(&self) -> bool {
            self.fail_with.is_none()
        }
    }

    // Helper to run a future to completion (simple blocking executor)
    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: We don't move f after pinning
        let mut f = unsafe { Pin::new_unchecked(&mut f) };

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {
                    panic!("Mock future returned Pending unexpectedly");
                }
            }
        }
    }

    fn joystick() -> (ArcadeJoystick<MockTransport>, Sent) {
        let registry = MockRegistry::new();
        let sent = registry.sent.clone();
        (ArcadeJoystick::initialize(registry), sent)
    }

    #[test]
    fn test_initialize_registers_descriptor_once() {
        let registry = MockRegistry::new();
        let registered = registry.registered.clone();

        let joystick = ArcadeJoystick::initialize(registry);

        let registered = registered.lock().unwrap();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0], REPORT_DESCRIPTOR);
        assert_eq!(*joystick.state(), DeviceState::idle());
    }

    #[test]
    fn test_send_idle_report() {
        let (mut joystick, sent) = joystick();

        assert!(block_on(joystick.send_report()).is_ok());

        let sent = sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![(REPORT_ID, vec![0x7F, 0x7F, 0x7F, 0x7F, 0x0F, 0x00, 0x00])]
        );
    }

    #[test]
    fn test_move_right_press_button_one() {
        let (mut joystick, sent) = joystick();

        joystick.state_mut().reset();
        joystick.state_mut().move_right();
        joystick.state_mut().press_button(Buttons(0x01));
        block_on(joystick.send_report()).unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].1, [0x7F, 0x7F, 0xFF, 0x7F, 0x0F, 0x00, 0x00]);
    }

    #[test]
    fn test_axes_follow_last_move() {
        let (mut joystick, sent) = joystick();

        let state = joystick.state_mut();
        state.move_left();
        state.move_right();
        state.move_down();
        state.move_up();
        block_on(joystick.send_report()).unwrap();

        joystick.state_mut().reset();
        block_on(joystick.send_report()).unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].1[JoystickReport::OFFSET_X], 0xFF);
        assert_eq!(sent[0].1[JoystickReport::OFFSET_Y], 0x00);
        assert_eq!(sent[1].1[JoystickReport::OFFSET_X], 0x7F);
        assert_eq!(sent[1].1[JoystickReport::OFFSET_Y], 0x7F);
    }

    #[test]
    fn test_update_resets_between_frames() {
        let (mut joystick, sent) = joystick();

        let mut buttons = [false; FACE_BUTTONS];
        buttons[1] = true;
        let pressed = PanelSnapshot {
            left: true,
            buttons,
            mode: true,
            ..PanelSnapshot::released()
        };

        block_on(joystick.update(&pressed, &ButtonMap::DEFAULT)).unwrap();
        block_on(joystick.update(&PanelSnapshot::released(), &ButtonMap::DEFAULT)).unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0].1,
            [
                0x7F,
                0x7F,
                0x00,
                0x7F,
                (DeviceState::IDLE_BUTTONS | Buttons::BUTTON_2).raw(),
                StartButtons::MODE.raw(),
                0x00
            ]
        );
        assert_eq!(sent[1].1, [0x7F, 0x7F, 0x7F, 0x7F, 0x0F, 0x00, 0x00]);
    }

    #[test]
    fn test_transport_error_passed_through() {
        let mut registry = MockRegistry::new();
        registry.fail_with = Some(TransportError::Disconnected);
        let sent = registry.sent.clone();

        let mut joystick = ArcadeJoystick::initialize(registry);
        assert!(!joystick.transport().is_ready());

        let result = block_on(joystick.send_report());
        assert_eq!(result, Err(TransportError::Disconnected));
        assert!(sent.lock().unwrap().is_empty());
    }
}
