//! Vendor output report written back by the host.

use crate::descriptor::REPORT_ID;

/// Error type for decoding an output report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedbackError {
    /// Report ID not declared by the descriptor.
    UnknownReport,
    /// Payload length differs from the declared output report.
    Length,
}

/// The four host-writable vendor bits.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VendorOutput(u8);

impl VendorOutput {
    /// Size of the output report body in bytes.
    pub const SIZE: usize = 1;

    /// Data bits; the high nibble is constant padding.
    pub const MASK: u8 = 0x0F;

    /// Decode an output report.
    ///
    /// `data` is either the bare body or the body with the report ID still
    /// in front, which is how the USB stack hands over reports from
    /// descriptors that use report IDs (both on the interrupt OUT endpoint
    /// and on the control pipe).
    pub fn from_report(report_id: u8, data: &[u8]) -> Result<Self, FeedbackError> {
        if report_id != REPORT_ID {
            return Err(FeedbackError::UnknownReport);
        }
        match data {
            [byte] => Ok(Self(byte & Self::MASK)),
            [id, byte] if *id == REPORT_ID => Ok(Self(byte & Self::MASK)),
            [_, _] => Err(FeedbackError::UnknownReport),
            _ => Err(FeedbackError::Length),
        }
    }

    /// Whether vendor output bit `n` (0-3) is set.
    #[inline]
    #[must_use]
    pub const fn bit(self, n: u8) -> bool {
        n < 4 && self.0 & (1 << n) != 0
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bits() {
        let out = VendorOutput::from_report(REPORT_ID, &[0b0101]).unwrap();
        assert!(out.bit(0));
        assert!(!out.bit(1));
        assert!(out.bit(2));
        assert!(!out.bit(3));
    }

    #[test]
    fn test_padding_masked() {
        let out = VendorOutput::from_report(REPORT_ID, &[0xF1]).unwrap();
        assert_eq!(out.raw(), 0x01);
        assert!(!out.bit(4));
    }

    #[test]
    fn test_decode_id_prefixed_buffer() {
        let out = VendorOutput::from_report(REPORT_ID, &[REPORT_ID, 0x01]).unwrap();
        assert_eq!(out.raw(), 0x01);
        assert!(out.bit(0));

        let out = VendorOutput::from_report(REPORT_ID, &[REPORT_ID, 0xFA]).unwrap();
        assert_eq!(out.raw(), 0x0A);
    }

    #[test]
    fn test_prefixed_buffer_with_other_id() {
        assert_eq!(
            VendorOutput::from_report(REPORT_ID, &[0x02, 0x01]),
            Err(FeedbackError::UnknownReport)
        );
    }

    #[test]
    fn test_wrong_report_id() {
        assert_eq!(
            VendorOutput::from_report(0x02, &[0x01]),
            Err(FeedbackError::UnknownReport)
        );
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            VendorOutput::from_report(REPORT_ID, &[]),
            Err(FeedbackError::Length)
        );
        assert_eq!(
            VendorOutput::from_report(REPORT_ID, &[REPORT_ID, 0x01, 0x00]),
            Err(FeedbackError::Length)
        );
    }
}
