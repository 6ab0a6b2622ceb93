//! Transport traits and error types.
//!
//! The USB stack is reached through two seams: registering the report
//! descriptor once, and sending report bodies afterwards. Registration
//! consumes the [`DescriptorRegistry`] and yields the [`ReportTransport`],
//! so a report can never be sent before the descriptor is in place.

use core::future::Future;

use crate::report::JoystickReport;

/// Largest framed report: the report ID byte plus the input report body.
pub const REPORT_FRAME_SIZE: usize = 1 + JoystickReport::SIZE;

/// Error type for transport operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Endpoint disabled (e.g., cable unplugged or configuration reset).
    Disconnected,
    /// Report larger than the endpoint packet.
    BufferOverflow,
}

impl TransportError {
    /// Whether resending the same report can succeed later.
    ///
    /// A disconnected endpoint comes back after re-enumeration; an oversized
    /// report never fits.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        matches!(self, TransportError::Disconnected)
    }
}

/// Prefix `body` with `report_id` for an endpoint that uses report IDs.
///
/// Returns the packet buffer and the number of bytes to send.
pub fn frame_report(
    report_id: u8,
    body: &[u8],
) -> Result<([u8; REPORT_FRAME_SIZE], usize), TransportError> {
    let len = body.len() + 1;
    let mut packet = [0u8; REPORT_FRAME_SIZE];
    if len > packet.len() {
        return Err(TransportError::BufferOverflow);
    }
    packet[0] = report_id;
    packet[1..len].copy_from_slice(body);
    Ok((packet, len))
}

/// One-time descriptor registration.
pub trait DescriptorRegistry {
    /// Transport handed back once the descriptor is registered.
    type Transport: ReportTransport;

    /// Register `descriptor` for every report sent through the returned transport.
    fn register_descriptor(self, descriptor: &'static [u8]) -> Self::Transport;
}

/// Async trait for report transmission.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ReportTransport {
    /// Send one report body tagged with `report_id`.
    ///
    /// May block until the previous report has been sent.
    fn send_report(
        &mut self,
        report_id: u8,
        body: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>>;

    /// Check if the transport is ready to accept reports.
    fn is_ready(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::REPORT_ID;
    use crate::state::DeviceState;

    #[test]
    fn test_frame_input_report() {
        let body = JoystickReport::idle().as_bytes();
        let (packet, len) = frame_report(REPORT_ID, &body).unwrap();

        assert_eq!(len, 8);
        assert_eq!(packet, [0x01, 0x7F, 0x7F, 0x7F, 0x7F, 0x0F, 0x00, 0x00]);
    }

    #[test]
    fn test_frame_carries_state_bytes() {
        let mut state = DeviceState::idle();
        state.move_right();
        state.move_up();
        let (packet, len) = frame_report(REPORT_ID, &state.report().as_bytes()).unwrap();

        assert_eq!(&packet[..len], &[0x01, 0x7F, 0x7F, 0xFF, 0x00, 0x0F, 0x00, 0x00]);
    }

    #[test]
    fn test_frame_short_body() {
        let (packet, len) = frame_report(0x05, &[0xAA]).unwrap();
        assert_eq!(len, 2);
        assert_eq!(&packet[..len], &[0x05, 0xAA]);
        assert!(packet[len..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_frame_oversized_body() {
        let body = [0u8; JoystickReport::SIZE + 1];
        assert_eq!(
            frame_report(REPORT_ID, &body),
            Err(TransportError::BufferOverflow)
        );
    }

    #[test]
    fn test_only_disconnect_is_recoverable() {
        assert!(TransportError::Disconnected.is_recoverable());
        assert!(!TransportError::BufferOverflow.is_recoverable());
    }
}
