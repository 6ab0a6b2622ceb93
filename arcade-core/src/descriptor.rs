//! HID report descriptor for the arcade joystick, plus a small item walker.
//!
//! The descriptor declares one input report and one output report, both
//! under report ID [`REPORT_ID`]:
//!
//! | Bits    | Field                                  | Report byte      |
//! |---------|----------------------------------------|------------------|
//! | 0..16   | two reserved bytes (constant)          | 0, 1             |
//! | 16..24  | X axis, 0..255                         | 2                |
//! | 24..32  | Y axis, 0..255                         | 3                |
//! | 32..36  | hat switch, 0..7 (0xF = null)          | 4, low nibble    |
//! | 36..46  | buttons 1-10                           | 4 high, 5 low    |
//! | 46..56  | vendor bits 1-10                       | 5 top 2 bits, 6  |
//!
//! HID packs fields LSB-first in declaration order, so the descriptor order
//! above is also the order [`JoystickReport::as_bytes`](crate::JoystickReport::as_bytes)
//! writes. The total is checked against the report size at compile time.

use heapless::{LinearMap, Vec};
use static_assertions::const_assert_eq;

use crate::feedback::VendorOutput;
use crate::report::JoystickReport;

/// Report ID shared by the input and output reports.
pub const REPORT_ID: u8 = 0x01;

/// Arcade joystick report descriptor.
#[rustfmt::skip]
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01,       // Usage Page (Generic Desktop)
    0x09, 0x04,       // Usage (Joystick)
    0xA1, 0x01,       // Collection (Application)
    0xA1, 0x02,       //   Collection (Logical)
    0x85, REPORT_ID,  //     Report ID (1)
    //
    // --- Reserved bytes + X/Y axes ---
    0x75, 0x08,       //     Report Size (8)
    0x95, 0x02,       //     Report Count (2)
    0x15, 0x00,       //     Logical Minimum (0)
    0x26, 0xFF, 0x00, //     Logical Maximum (255)
    0x35, 0x00,       //     Physical Minimum (0)
    0x46, 0xFF, 0x00, //     Physical Maximum (255)
    0x81, 0x03,       //     Input (Constant, Variable, Absolute)
    0x09, 0x30,       //     Usage (X)
    0x09, 0x31,       //     Usage (Y)
    0x95, 0x02,       //     Report Count (2)
    0x81, 0x02,       //     Input (Data, Variable, Absolute)
    //
    // --- Hat switch ---
    0x75, 0x04,       //     Report Size (4)
    0x95, 0x01,       //     Report Count (1)
    0x25, 0x07,       //     Logical Maximum (7)
    0x46, 0x3B, 0x01, //     Physical Maximum (315)
    0x65, 0x14,       //     Unit (English Rotation: Degrees)
    0x09, 0x39,       //     Usage (Hat switch)
    0x81, 0x42,       //     Input (Data, Variable, Absolute, Null State)
    //
    // --- Buttons 1-10 ---
    0x65, 0x00,       //     Unit (None)
    0x75, 0x01,       //     Report Size (1)
    0x95, 0x0A,       //     Report Count (10)
    0x25, 0x01,       //     Logical Maximum (1)
    0x45, 0x01,       //     Physical Maximum (1)
    0x05, 0x09,       //     Usage Page (Button)
    0x19, 0x01,       //     Usage Minimum (Button 1)
    0x29, 0x0A,       //     Usage Maximum (Button 10)
    0x81, 0x02,       //     Input (Data, Variable, Absolute)
    //
    // --- Vendor input bits (start/mode group) ---
    0x06, 0x00, 0xFF, //     Usage Page (Vendor Defined 0xFF00)
    0x09, 0x01,       //     Usage (Vendor 1)
    0x95, 0x0A,       //     Report Count (10)
    0x81, 0x02,       //     Input (Data, Variable, Absolute)
    0xC0,             //   End Collection
    //
    // --- Vendor output (host feedback) ---
    0xA1, 0x02,       //   Collection (Logical)
    0x09, 0x02,       //     Usage (Vendor 2)
    0x75, 0x01,       //     Report Size (1)
    0x95, 0x04,       //     Report Count (4)
    0x91, 0x02,       //     Output (Data, Variable, Absolute)
    0x95, 0x04,       //     Report Count (4)
    0x91, 0x03,       //     Output (Constant) - pad to a byte
    0xC0,             //   End Collection
    0xC0,             // End Collection
];

/// Input bits declared for [`REPORT_ID`].
pub const INPUT_REPORT_BITS: usize = input_report_bits(REPORT_DESCRIPTOR, REPORT_ID);

/// Output bits declared for [`REPORT_ID`].
pub const OUTPUT_REPORT_BITS: usize = output_report_bits(REPORT_DESCRIPTOR, REPORT_ID);

const_assert_eq!(INPUT_REPORT_BITS, JoystickReport::SIZE * 8);
const_assert_eq!(OUTPUT_REPORT_BITS, VendorOutput::SIZE * 8);

/// Maximum number of main items returned by [`fields`].
pub const MAX_FIELDS: usize = 16;

/// Maximum number of distinct report IDs tracked by [`fields`].
const MAX_REPORTS: usize = 4;

// Item prefixes with the size bits masked off.
const ITEM_INPUT: u8 = 0x80;
const ITEM_OUTPUT: u8 = 0x90;
const ITEM_FEATURE: u8 = 0xB0;
const ITEM_COLLECTION: u8 = 0xA0;
const ITEM_END_COLLECTION: u8 = 0xC0;
const ITEM_USAGE_PAGE: u8 = 0x04;
const ITEM_LOGICAL_MIN: u8 = 0x14;
const ITEM_LOGICAL_MAX: u8 = 0x24;
const ITEM_PHYSICAL_MIN: u8 = 0x34;
const ITEM_PHYSICAL_MAX: u8 = 0x44;
const ITEM_UNIT: u8 = 0x64;
const ITEM_REPORT_SIZE: u8 = 0x74;
const ITEM_REPORT_ID: u8 = 0x84;
const ITEM_REPORT_COUNT: u8 = 0x94;
const ITEM_USAGE: u8 = 0x08;
const ITEM_USAGE_MIN: u8 = 0x18;
const ITEM_LONG: u8 = 0xFE;

/// Error type for descriptor inspection.
///
/// These only arise from a malformed descriptor, which is an authoring
/// defect rather than a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DescriptorError {
    /// An item's data runs past the end of the descriptor.
    Truncated,
    /// Long items are not used by HID 1.11 and are rejected.
    LongItem,
    /// More main items than [`MAX_FIELDS`], or more than four report IDs.
    TooManyFields,
    /// End Collection without a matching Collection, or vice versa.
    UnbalancedCollection,
}

/// Direction of a main item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldKind {
    Input,
    Output,
    Feature,
}

impl FieldKind {
    const fn index(self) -> usize {
        match self {
            FieldKind::Input => 0,
            FieldKind::Output => 1,
            FieldKind::Feature => 2,
        }
    }
}

/// One Input/Output/Feature main item with the global and local state
/// in effect when it was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportField {
    pub kind: FieldKind,
    pub report_id: u8,
    /// Offset in bits from the start of the report body (report ID excluded).
    pub bit_offset: usize,
    pub report_size: u8,
    pub report_count: u8,
    pub usage_page: u16,
    /// First usage (or Usage Minimum) attached to the item, if any.
    pub usage: Option<u16>,
    pub logical_min: i32,
    pub logical_max: i32,
    pub physical_min: i32,
    pub physical_max: i32,
    pub unit: u32,
    /// Raw main item flags (bit 0 constant, bit 1 variable, bit 6 null state).
    pub flags: u32,
}

impl ReportField {
    /// Total width of the field in bits.
    #[inline]
    #[must_use]
    pub const fn bits(&self) -> usize {
        self.report_size as usize * self.report_count as usize
    }

    /// Whether the field is constant padding.
    #[inline]
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        self.flags & 0x01 != 0
    }

    /// Whether out-of-range values mean "no input" (used by hat switches).
    #[inline]
    #[must_use]
    pub const fn has_null_state(&self) -> bool {
        self.flags & 0x40 != 0
    }
}

/// Number of data bytes carried by a short item prefix.
const fn item_data_len(prefix: u8) -> usize {
    match prefix & 0x03 {
        0 => 0,
        1 => 1,
        2 => 2,
        _ => 4,
    }
}

/// Little-endian item data starting at `start`.
const fn item_data(descriptor: &[u8], start: usize, len: usize) -> u32 {
    let mut value = 0u32;
    let mut i = 0;
    while i < len {
        value |= (descriptor[start + i] as u32) << (8 * i);
        i += 1;
    }
    value
}

/// Sign-extend item data for the signed global items (logical/physical ranges).
const fn item_data_signed(data: u32, len: usize) -> i32 {
    match len {
        1 => data as u8 as i8 as i32,
        2 => data as u16 as i16 as i32,
        _ => data as i32,
    }
}

/// Sum of `size * count` over the main items with tag `main_item` that
/// belong to `report_id`. Stops at the first truncated item.
const fn main_item_bits(descriptor: &[u8], report_id: u8, main_item: u8) -> usize {
    let mut i = 0;
    let mut size = 0usize;
    let mut count = 0usize;
    let mut id = 0u8;
    let mut bits = 0usize;

    while i < descriptor.len() {
        let prefix = descriptor[i];
        if prefix == ITEM_LONG {
            if i + 1 >= descriptor.len() {
                break;
            }
            i += 3 + descriptor[i + 1] as usize;
            continue;
        }

        let len = item_data_len(prefix);
        if i + 1 + len > descriptor.len() {
            break;
        }
        let data = item_data(descriptor, i + 1, len);

        match prefix & 0xFC {
            ITEM_REPORT_SIZE => size = data as usize,
            ITEM_REPORT_COUNT => count = data as usize,
            ITEM_REPORT_ID => id = data as u8,
            tag if tag == main_item => {
                if id == report_id {
                    bits += size * count;
                }
            }
            _ => {}
        }
        i += 1 + len;
    }

    bits
}

/// Total input bits a descriptor declares for `report_id`.
///
/// Use report ID 0 for descriptors that declare no Report ID item.
#[must_use]
pub const fn input_report_bits(descriptor: &[u8], report_id: u8) -> usize {
    main_item_bits(descriptor, report_id, ITEM_INPUT)
}

/// Total output bits a descriptor declares for `report_id`.
#[must_use]
pub const fn output_report_bits(descriptor: &[u8], report_id: u8) -> usize {
    main_item_bits(descriptor, report_id, ITEM_OUTPUT)
}

/// Global item state.
#[derive(Clone, Copy, Default)]
struct Globals {
    usage_page: u16,
    logical_min: i32,
    logical_max: i32,
    physical_min: i32,
    physical_max: i32,
    unit: u32,
    report_size: u8,
    report_count: u8,
    report_id: u8,
}

/// Walk a descriptor and list its Input/Output/Feature items in order.
///
/// Bit offsets are tracked per report ID and per direction, so the result
/// tells exactly where each field lands in the report body.
pub fn fields(descriptor: &[u8]) -> Result<Vec<ReportField, MAX_FIELDS>, DescriptorError> {
    let mut out = Vec::new();
    let mut offsets: LinearMap<u8, [usize; 3], MAX_REPORTS> = LinearMap::new();
    let mut globals = Globals::default();
    let mut usage: Option<u16> = None;
    let mut depth = 0usize;
    let mut i = 0;

    while i < descriptor.len() {
        let prefix = descriptor[i];
        if prefix == ITEM_LONG {
            return Err(DescriptorError::LongItem);
        }

        let len = item_data_len(prefix);
        if i + 1 + len > descriptor.len() {
            return Err(DescriptorError::Truncated);
        }
        let data = item_data(descriptor, i + 1, len);
        i += 1 + len;

        match prefix & 0xFC {
            ITEM_USAGE_PAGE => globals.usage_page = data as u16,
            ITEM_LOGICAL_MIN => globals.logical_min = item_data_signed(data, len),
            ITEM_LOGICAL_MAX => globals.logical_max = item_data_signed(data, len),
            ITEM_PHYSICAL_MIN => globals.physical_min = item_data_signed(data, len),
            ITEM_PHYSICAL_MAX => globals.physical_max = item_data_signed(data, len),
            ITEM_UNIT => globals.unit = data,
            ITEM_REPORT_SIZE => globals.report_size = data as u8,
            ITEM_REPORT_COUNT => globals.report_count = data as u8,
            ITEM_REPORT_ID => globals.report_id = data as u8,
            ITEM_USAGE | ITEM_USAGE_MIN => {
                if usage.is_none() {
                    usage = Some(data as u16);
                }
            }
            ITEM_COLLECTION => {
                depth += 1;
                usage = None;
            }
            ITEM_END_COLLECTION => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(DescriptorError::UnbalancedCollection)?;
                usage = None;
            }
            tag @ (ITEM_INPUT | ITEM_OUTPUT | ITEM_FEATURE) => {
                let kind = match tag {
                    ITEM_INPUT => FieldKind::Input,
                    ITEM_OUTPUT => FieldKind::Output,
                    _ => FieldKind::Feature,
                };
                if offsets.get(&globals.report_id).is_none() {
                    offsets
                        .insert(globals.report_id, [0; 3])
                        .map_err(|_| DescriptorError::TooManyFields)?;
                }
                let slot = offsets
                    .get_mut(&globals.report_id)
                    .ok_or(DescriptorError::TooManyFields)?;

                let field = ReportField {
                    kind,
                    report_id: globals.report_id,
                    bit_offset: slot[kind.index()],
                    report_size: globals.report_size,
                    report_count: globals.report_count,
                    usage_page: globals.usage_page,
                    usage,
                    logical_min: globals.logical_min,
                    logical_max: globals.logical_max,
                    physical_min: globals.physical_min,
                    physical_max: globals.physical_max,
                    unit: globals.unit,
                    flags: data,
                };
                slot[kind.index()] += field.bits();
                out.push(field)
                    .map_err(|_| DescriptorError::TooManyFields)?;
                usage = None;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(DescriptorError::UnbalancedCollection);
    }
    Ok(out)
}
