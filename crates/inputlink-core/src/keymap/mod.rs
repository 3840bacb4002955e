//! Scan code translation tables for keyboard and pointer event mapping.
//!
//! The canonical representation is USB HID Usage IDs (page 0x07). Raw evdev
//! codes are translated to HID once, at the capture boundary; everything past
//! the translator speaks HID.

pub mod hid;
pub mod linux_evdev;

pub use hid::HidKey;

use crate::protocol::messages::{Axis, PointerButton};

/// Unified scan-code lookup facade over the per-domain tables.
///
/// All lookups are pure: fixed literal data, no state, no failure mode beyond
/// "not found". Safe for concurrent use from any number of capture threads.
pub struct ScanCodeTable;

impl ScanCodeTable {
    /// Translates an evdev key code to its portable HID usage.
    ///
    /// Returns `None` for modifiers, buttons, and unmapped codes; callers
    /// drop such events silently rather than treating them as errors.
    pub fn to_portable(code: u16) -> Option<HidKey> {
        linux_evdev::key_to_hid(code)
    }

    /// Returns the HID report modifier bit for an evdev modifier key code.
    pub fn modifier_bit(code: u16) -> Option<u8> {
        linux_evdev::key_to_modifier_bit(code)
    }

    /// Returns the named pointer button for an evdev button code.
    pub fn pointer_button(code: u16) -> Option<PointerButton> {
        linux_evdev::key_to_button(code)
    }

    /// Returns the named motion axis for an evdev relative axis code.
    pub fn relative_axis(code: u16) -> Option<Axis> {
        linux_evdev::rel_to_axis(code)
    }
}
