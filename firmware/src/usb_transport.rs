//! USB HID transport for the arcade joystick.

use arcade_core::{frame_report, DescriptorRegistry, ReportTransport, TransportError, REPORT_FRAME_SIZE};
use defmt::trace;
use embassy_usb::class::hid::{HidReader, HidReaderWriter, HidWriter, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::Builder;

use crate::config::{IN_PACKET_SIZE, OUT_PACKET_SIZE, POLL_MS};
use crate::feedback::FeedbackHandler;

const _: () = assert!(IN_PACKET_SIZE >= REPORT_FRAME_SIZE);

/// RP2040 USB driver.
pub type UsbDriver<'d> = embassy_rp::usb::Driver<'d, embassy_rp::peripherals::USB>;

/// Reader half for host output reports.
pub type FeedbackReader<'d> = HidReader<'d, UsbDriver<'d>, OUT_PACKET_SIZE>;

/// Convert endpoint errors to [`TransportError`].
///
/// This is a helper function instead of a `From` impl to avoid orphan rule issues
/// (both `EndpointError` and `TransportError` are defined in external crates).
#[inline]
fn endpoint_error_to_transport_error(e: EndpointError) -> TransportError {
    match e {
        EndpointError::BufferOverflow => TransportError::BufferOverflow,
        EndpointError::Disabled => TransportError::Disconnected,
    }
}

/// HID class registration on a USB builder that is still being assembled.
pub struct UsbHidRegistry<'a, 'd> {
    builder: &'a mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
    handler: &'d mut FeedbackHandler,
}

impl<'a, 'd> UsbHidRegistry<'a, 'd> {
    /// `handler` answers SET_REPORT control requests for the output report.
    pub fn new(
        builder: &'a mut Builder<'d, UsbDriver<'d>>,
        state: &'d mut State<'d>,
        handler: &'d mut FeedbackHandler,
    ) -> Self {
        Self {
            builder,
            state,
            handler,
        }
    }
}

impl<'d> DescriptorRegistry for UsbHidRegistry<'_, 'd> {
    type Transport = UsbHidTransport<'d>;

    fn register_descriptor(self, descriptor: &'static [u8]) -> UsbHidTransport<'d> {
        let config = embassy_usb::class::hid::Config {
            report_descriptor: descriptor,
            request_handler: Some(self.handler),
            poll_ms: POLL_MS,
            max_packet_size: IN_PACKET_SIZE as u16,
            hid_subclass: embassy_usb::class::hid::HidSubclass::No,
            hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
        };

        let (reader, writer) =
            HidReaderWriter::<_, OUT_PACKET_SIZE, IN_PACKET_SIZE>::new(self.builder, self.state, config)
                .split();

        UsbHidTransport {
            writer,
            reader: Some(reader),
            ready: false,
        }
    }
}

/// USB HID report transport.
///
/// Wraps an embassy-usb HID writer and prefixes every body with its report ID.
pub struct UsbHidTransport<'d> {
    writer: HidWriter<'d, UsbDriver<'d>, IN_PACKET_SIZE>,
    reader: Option<FeedbackReader<'d>>,
    ready: bool,
}

impl<'d> UsbHidTransport<'d> {
    /// Wait until the device is ready (USB enumerated).
    pub async fn wait_ready(&mut self) {
        self.writer.ready().await;
        self.ready = true;
    }

    /// Take the OUT reader so another task can service host output reports.
    ///
    /// Returns `None` after the first call.
    pub fn take_reader(&mut self) -> Option<FeedbackReader<'d>> {
        self.reader.take()
    }
}

impl ReportTransport for UsbHidTransport<'_> {
    async fn send_report(&mut self, report_id: u8, body: &[u8]) -> Result<(), TransportError> {
        let (packet, len) = frame_report(report_id, body)?;

        trace!("HID IN {=[u8]:x}", &packet[..len]);
        self.writer
            .write(&packet[..len])
            .await
            .map_err(|e| {
                let err = endpoint_error_to_transport_error(e);
                if err == TransportError::Disconnected {
                    self.ready = false;
                }
                err
            })
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}
