//! USB HID Usage IDs (page 0x07, Keyboard/Keypad page).
//!
//! This is the portable key representation carried on the wire. Raw evdev
//! scan codes are translated to HID at the capture boundary, so the replaying
//! side never has to know which platform produced an event.
//!
//! Reference: USB HID Usage Tables 1.3, Section 10 (Keyboard/Keypad page 0x07).
//!
//! HID usage IDs identify *physical key positions*, not characters: letters
//! start at 0x04 rather than at any ASCII value, and the character a key
//! produces is the receiving layout's business. Only the subset below is
//! populated; modifier keys are deliberately absent from this enum because
//! they travel as bits of the report modifier byte, never as usages
//! (see [`crate::domain::report::ModifierFlags`]).

use serde::{Deserialize, Serialize};

/// USB HID Usage ID for a non-modifier keyboard key (page 0x07).
///
/// The numeric value of each variant is its HID Usage ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HidKey {
    // Letters (HID 0x04–0x1D)
    KeyA = 0x04,
    KeyB = 0x05,
    KeyC = 0x06,
    KeyD = 0x07,
    KeyE = 0x08,
    KeyF = 0x09,
    KeyG = 0x0A,
    KeyH = 0x0B,
    KeyI = 0x0C,
    KeyJ = 0x0D,
    KeyK = 0x0E,
    KeyL = 0x0F,
    KeyM = 0x10,
    KeyN = 0x11,
    KeyO = 0x12,
    KeyP = 0x13,
    KeyQ = 0x14,
    KeyR = 0x15,
    KeyS = 0x16,
    KeyT = 0x17,
    KeyU = 0x18,
    KeyV = 0x19,
    KeyW = 0x1A,
    KeyX = 0x1B,
    KeyY = 0x1C,
    KeyZ = 0x1D,

    // Digits (HID 0x1E–0x27)
    Digit1 = 0x1E,
    Digit2 = 0x1F,
    Digit3 = 0x20,
    Digit4 = 0x21,
    Digit5 = 0x22,
    Digit6 = 0x23,
    Digit7 = 0x24,
    Digit8 = 0x25,
    Digit9 = 0x26,
    Digit0 = 0x27,

    // Control keys (HID 0x28–0x38)
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Backquote = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,

    // Lock keys
    CapsLock = 0x39,

    // Function keys (HID 0x3A–0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation cluster (HID 0x46–0x4E)
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,

    // Arrow keys (HID 0x4F–0x52)
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,

    // Keypad (HID 0x53–0x63)
    NumLock = 0x53,
    NumpadDivide = 0x54,
    NumpadMultiply = 0x55,
    NumpadSubtract = 0x56,
    NumpadAdd = 0x57,
    NumpadEnter = 0x58,
    Numpad1 = 0x59,
    Numpad2 = 0x5A,
    Numpad3 = 0x5B,
    Numpad4 = 0x5C,
    Numpad5 = 0x5D,
    Numpad6 = 0x5E,
    Numpad7 = 0x5F,
    Numpad8 = 0x60,
    Numpad9 = 0x61,
    Numpad0 = 0x62,
    NumpadDecimal = 0x63,

    // Application / menu key (HID 0x65)
    ContextMenu = 0x65,
}

impl HidKey {
    /// Returns the raw HID usage ID carried in wire messages.
    pub fn usage(self) -> u8 {
        self as u8
    }

    /// Returns the DOM `KeyboardEvent.code` style name for this key.
    ///
    /// Populates the human-readable `key_name` field of keyboard messages so
    /// the receiving side can log events without its own usage table.
    pub fn name(self) -> &'static str {
        match self {
            HidKey::KeyA => "KeyA",
            HidKey::KeyB => "KeyB",
            HidKey::KeyC => "KeyC",
            HidKey::KeyD => "KeyD",
            HidKey::KeyE => "KeyE",
            HidKey::KeyF => "KeyF",
            HidKey::KeyG => "KeyG",
            HidKey::KeyH => "KeyH",
            HidKey::KeyI => "KeyI",
            HidKey::KeyJ => "KeyJ",
            HidKey::KeyK => "KeyK",
            HidKey::KeyL => "KeyL",
            HidKey::KeyM => "KeyM",
            HidKey::KeyN => "KeyN",
            HidKey::KeyO => "KeyO",
            HidKey::KeyP => "KeyP",
            HidKey::KeyQ => "KeyQ",
            HidKey::KeyR => "KeyR",
            HidKey::KeyS => "KeyS",
            HidKey::KeyT => "KeyT",
            HidKey::KeyU => "KeyU",
            HidKey::KeyV => "KeyV",
            HidKey::KeyW => "KeyW",
            HidKey::KeyX => "KeyX",
            HidKey::KeyY => "KeyY",
            HidKey::KeyZ => "KeyZ",
            HidKey::Digit1 => "Digit1",
            HidKey::Digit2 => "Digit2",
            HidKey::Digit3 => "Digit3",
            HidKey::Digit4 => "Digit4",
            HidKey::Digit5 => "Digit5",
            HidKey::Digit6 => "Digit6",
            HidKey::Digit7 => "Digit7",
            HidKey::Digit8 => "Digit8",
            HidKey::Digit9 => "Digit9",
            HidKey::Digit0 => "Digit0",
            HidKey::Enter => "Enter",
            HidKey::Escape => "Escape",
            HidKey::Backspace => "Backspace",
            HidKey::Tab => "Tab",
            HidKey::Space => "Space",
            HidKey::Minus => "Minus",
            HidKey::Equal => "Equal",
            HidKey::BracketLeft => "BracketLeft",
            HidKey::BracketRight => "BracketRight",
            HidKey::Backslash => "Backslash",
            HidKey::Semicolon => "Semicolon",
            HidKey::Quote => "Quote",
            HidKey::Backquote => "Backquote",
            HidKey::Comma => "Comma",
            HidKey::Period => "Period",
            HidKey::Slash => "Slash",
            HidKey::CapsLock => "CapsLock",
            HidKey::F1 => "F1",
            HidKey::F2 => "F2",
            HidKey::F3 => "F3",
            HidKey::F4 => "F4",
            HidKey::F5 => "F5",
            HidKey::F6 => "F6",
            HidKey::F7 => "F7",
            HidKey::F8 => "F8",
            HidKey::F9 => "F9",
            HidKey::F10 => "F10",
            HidKey::F11 => "F11",
            HidKey::F12 => "F12",
            HidKey::PrintScreen => "PrintScreen",
            HidKey::ScrollLock => "ScrollLock",
            HidKey::Pause => "Pause",
            HidKey::Insert => "Insert",
            HidKey::Home => "Home",
            HidKey::PageUp => "PageUp",
            HidKey::Delete => "Delete",
            HidKey::End => "End",
            HidKey::PageDown => "PageDown",
            HidKey::ArrowRight => "ArrowRight",
            HidKey::ArrowLeft => "ArrowLeft",
            HidKey::ArrowDown => "ArrowDown",
            HidKey::ArrowUp => "ArrowUp",
            HidKey::NumLock => "NumLock",
            HidKey::NumpadDivide => "NumpadDivide",
            HidKey::NumpadMultiply => "NumpadMultiply",
            HidKey::NumpadSubtract => "NumpadSubtract",
            HidKey::NumpadAdd => "NumpadAdd",
            HidKey::NumpadEnter => "NumpadEnter",
            HidKey::Numpad1 => "Numpad1",
            HidKey::Numpad2 => "Numpad2",
            HidKey::Numpad3 => "Numpad3",
            HidKey::Numpad4 => "Numpad4",
            HidKey::Numpad5 => "Numpad5",
            HidKey::Numpad6 => "Numpad6",
            HidKey::Numpad7 => "Numpad7",
            HidKey::Numpad8 => "Numpad8",
            HidKey::Numpad9 => "Numpad9",
            HidKey::Numpad0 => "Numpad0",
            HidKey::NumpadDecimal => "NumpadDecimal",
            HidKey::ContextMenu => "ContextMenu",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_matches_discriminant() {
        assert_eq!(HidKey::KeyA.usage(), 0x04);
        assert_eq!(HidKey::Digit0.usage(), 0x27);
        assert_eq!(HidKey::Enter.usage(), 0x28);
        assert_eq!(HidKey::NumpadDecimal.usage(), 0x63);
        assert_eq!(HidKey::ContextMenu.usage(), 0x65);
    }

    #[test]
    fn test_name_is_stable_across_calls() {
        assert_eq!(HidKey::KeyA.name(), "KeyA");
        assert_eq!(HidKey::Space.name(), "Space");
        assert_eq!(HidKey::ArrowUp.name(), "ArrowUp");
        assert_eq!(HidKey::F11.name(), HidKey::F11.name());
    }
}
