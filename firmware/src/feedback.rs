//! Host output reports (vendor feedback bits).
//!
//! The host writes the 4-bit vendor output either through SET_REPORT on
//! the control pipe or through the interrupt OUT endpoint. Both paths end
//! in [`FeedbackHandler::set_report`] with the report ID still in front of
//! the body; [`VendorOutput::from_report`] strips it and the decoded bits
//! go out on a latest-value signal read by the control loop.

use arcade_core::VendorOutput;
use defmt::{debug, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{ReportId, RequestHandler};
use embassy_usb::control::OutResponse;

/// Latest vendor output written by the host.
pub type FeedbackSignal = Signal<CriticalSectionRawMutex, VendorOutput>;

/// HID request handler that decodes output reports.
pub struct FeedbackHandler {
    signal: &'static FeedbackSignal,
}

impl FeedbackHandler {
    pub const fn new(signal: &'static FeedbackSignal) -> Self {
        Self { signal }
    }
}

impl RequestHandler for FeedbackHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        None
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        let ReportId::Out(report_id) = id else {
            warn!("Ignoring non-output report");
            return OutResponse::Rejected;
        };

        match VendorOutput::from_report(report_id, data) {
            Ok(output) => {
                debug!("Host feedback: {:?}", output);
                self.signal.signal(output);
                OutResponse::Accepted
            }
            Err(e) => {
                warn!("Rejected output report {}: {:?}", report_id, e);
                OutResponse::Rejected
            }
        }
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}
