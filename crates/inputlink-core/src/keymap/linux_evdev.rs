//! Linux evdev scan code to HID translation tables.
//!
//! evdev key codes are defined in `linux/input-event-codes.h`.
//! Reference: https://github.com/torvalds/linux/blob/master/include/uapi/linux/input-event-codes.h
//!
//! Three disjoint domains share the evdev `KEY_*`/`BTN_*` code space and are
//! kept in separate tables here:
//!
//! - ordinary keys, mapped to HID usages (page 0x07),
//! - modifier keys, mapped to one bit of the HID report modifier byte,
//! - pointer buttons (`BTN_LEFT`/`BTN_RIGHT`/`BTN_MIDDLE`), mapped to named
//!   button identifiers.
//!
//! A fourth table maps `REL_*` axis codes for relative motion events. Every
//! table is a fixed literal mapping; codes absent from all tables are simply
//! not forwarded.

use super::hid::HidKey;
use crate::domain::report::ModifierFlags;
use crate::protocol::messages::{Axis, PointerButton};

/// Translates an evdev key code to its HID usage.
///
/// Returns `None` for modifier keys, buttons, and any code outside the
/// populated subset.
pub fn key_to_hid(code: u16) -> Option<HidKey> {
    match code {
        // Top row
        1 => Some(HidKey::Escape),       // KEY_ESC
        2 => Some(HidKey::Digit1),       // KEY_1
        3 => Some(HidKey::Digit2),       // KEY_2
        4 => Some(HidKey::Digit3),       // KEY_3
        5 => Some(HidKey::Digit4),       // KEY_4
        6 => Some(HidKey::Digit5),       // KEY_5
        7 => Some(HidKey::Digit6),       // KEY_6
        8 => Some(HidKey::Digit7),       // KEY_7
        9 => Some(HidKey::Digit8),       // KEY_8
        10 => Some(HidKey::Digit9),      // KEY_9
        11 => Some(HidKey::Digit0),      // KEY_0
        12 => Some(HidKey::Minus),       // KEY_MINUS
        13 => Some(HidKey::Equal),       // KEY_EQUAL
        14 => Some(HidKey::Backspace),   // KEY_BACKSPACE
        15 => Some(HidKey::Tab),         // KEY_TAB

        // QWERTY row
        16 => Some(HidKey::KeyQ),        // KEY_Q
        17 => Some(HidKey::KeyW),        // KEY_W
        18 => Some(HidKey::KeyE),        // KEY_E
        19 => Some(HidKey::KeyR),        // KEY_R
        20 => Some(HidKey::KeyT),        // KEY_T
        21 => Some(HidKey::KeyY),        // KEY_Y
        22 => Some(HidKey::KeyU),        // KEY_U
        23 => Some(HidKey::KeyI),        // KEY_I
        24 => Some(HidKey::KeyO),        // KEY_O
        25 => Some(HidKey::KeyP),        // KEY_P
        26 => Some(HidKey::BracketLeft), // KEY_LEFTBRACE
        27 => Some(HidKey::BracketRight), // KEY_RIGHTBRACE
        28 => Some(HidKey::Enter),       // KEY_ENTER

        // Home row
        30 => Some(HidKey::KeyA),        // KEY_A
        31 => Some(HidKey::KeyS),        // KEY_S
        32 => Some(HidKey::KeyD),        // KEY_D
        33 => Some(HidKey::KeyF),        // KEY_F
        34 => Some(HidKey::KeyG),        // KEY_G
        35 => Some(HidKey::KeyH),        // KEY_H
        36 => Some(HidKey::KeyJ),        // KEY_J
        37 => Some(HidKey::KeyK),        // KEY_K
        38 => Some(HidKey::KeyL),        // KEY_L
        39 => Some(HidKey::Semicolon),   // KEY_SEMICOLON
        40 => Some(HidKey::Quote),       // KEY_APOSTROPHE
        41 => Some(HidKey::Backquote),   // KEY_GRAVE

        // Bottom row
        43 => Some(HidKey::Backslash),   // KEY_BACKSLASH
        44 => Some(HidKey::KeyZ),        // KEY_Z
        45 => Some(HidKey::KeyX),        // KEY_X
        46 => Some(HidKey::KeyC),        // KEY_C
        47 => Some(HidKey::KeyV),        // KEY_V
        48 => Some(HidKey::KeyB),        // KEY_B
        49 => Some(HidKey::KeyN),        // KEY_N
        50 => Some(HidKey::KeyM),        // KEY_M
        51 => Some(HidKey::Comma),       // KEY_COMMA
        52 => Some(HidKey::Period),      // KEY_DOT
        53 => Some(HidKey::Slash),       // KEY_SLASH

        55 => Some(HidKey::NumpadMultiply), // KEY_KPASTERISK
        57 => Some(HidKey::Space),       // KEY_SPACE
        58 => Some(HidKey::CapsLock),    // KEY_CAPSLOCK

        // Function keys
        59 => Some(HidKey::F1),          // KEY_F1
        60 => Some(HidKey::F2),          // KEY_F2
        61 => Some(HidKey::F3),          // KEY_F3
        62 => Some(HidKey::F4),          // KEY_F4
        63 => Some(HidKey::F5),          // KEY_F5
        64 => Some(HidKey::F6),          // KEY_F6
        65 => Some(HidKey::F7),          // KEY_F7
        66 => Some(HidKey::F8),          // KEY_F8
        67 => Some(HidKey::F9),          // KEY_F9
        68 => Some(HidKey::F10),         // KEY_F10
        87 => Some(HidKey::F11),         // KEY_F11
        88 => Some(HidKey::F12),         // KEY_F12

        // Keypad
        69 => Some(HidKey::NumLock),     // KEY_NUMLOCK
        70 => Some(HidKey::ScrollLock),  // KEY_SCROLLLOCK
        71 => Some(HidKey::Numpad7),     // KEY_KP7
        72 => Some(HidKey::Numpad8),     // KEY_KP8
        73 => Some(HidKey::Numpad9),     // KEY_KP9
        74 => Some(HidKey::NumpadSubtract), // KEY_KPMINUS
        75 => Some(HidKey::Numpad4),     // KEY_KP4
        76 => Some(HidKey::Numpad5),     // KEY_KP5
        77 => Some(HidKey::Numpad6),     // KEY_KP6
        78 => Some(HidKey::NumpadAdd),   // KEY_KPPLUS
        79 => Some(HidKey::Numpad1),     // KEY_KP1
        80 => Some(HidKey::Numpad2),     // KEY_KP2
        81 => Some(HidKey::Numpad3),     // KEY_KP3
        82 => Some(HidKey::Numpad0),     // KEY_KP0
        83 => Some(HidKey::NumpadDecimal), // KEY_KPDOT
        96 => Some(HidKey::NumpadEnter), // KEY_KPENTER
        98 => Some(HidKey::NumpadDivide), // KEY_KPSLASH

        // Navigation cluster
        99 => Some(HidKey::PrintScreen), // KEY_SYSRQ
        102 => Some(HidKey::Home),       // KEY_HOME
        103 => Some(HidKey::ArrowUp),    // KEY_UP
        104 => Some(HidKey::PageUp),     // KEY_PAGEUP
        105 => Some(HidKey::ArrowLeft),  // KEY_LEFT
        106 => Some(HidKey::ArrowRight), // KEY_RIGHT
        107 => Some(HidKey::End),        // KEY_END
        108 => Some(HidKey::ArrowDown),  // KEY_DOWN
        109 => Some(HidKey::PageDown),   // KEY_PAGEDOWN
        110 => Some(HidKey::Insert),     // KEY_INSERT
        111 => Some(HidKey::Delete),     // KEY_DELETE
        119 => Some(HidKey::Pause),      // KEY_PAUSE
        127 => Some(HidKey::ContextMenu), // KEY_COMPOSE

        _ => None,
    }
}

/// Translates an evdev modifier key code to its HID report modifier bit.
///
/// Bit layout follows the HID boot keyboard report (byte 0):
/// LCtrl, LShift, LAlt, LMeta, RCtrl, RShift, RAlt, RMeta.
pub fn key_to_modifier_bit(code: u16) -> Option<u8> {
    match code {
        29 => Some(ModifierFlags::LEFT_CTRL),   // KEY_LEFTCTRL
        42 => Some(ModifierFlags::LEFT_SHIFT),  // KEY_LEFTSHIFT
        56 => Some(ModifierFlags::LEFT_ALT),    // KEY_LEFTALT
        125 => Some(ModifierFlags::LEFT_META),  // KEY_LEFTMETA
        97 => Some(ModifierFlags::RIGHT_CTRL),  // KEY_RIGHTCTRL
        54 => Some(ModifierFlags::RIGHT_SHIFT), // KEY_RIGHTSHIFT
        100 => Some(ModifierFlags::RIGHT_ALT),  // KEY_RIGHTALT
        126 => Some(ModifierFlags::RIGHT_META), // KEY_RIGHTMETA
        _ => None,
    }
}

/// Translates an evdev button code to a named pointer button.
pub fn key_to_button(code: u16) -> Option<PointerButton> {
    match code {
        0x110 => Some(PointerButton::Left),   // BTN_LEFT
        0x111 => Some(PointerButton::Right),  // BTN_RIGHT
        0x112 => Some(PointerButton::Middle), // BTN_MIDDLE
        _ => None,
    }
}

/// Translates an evdev relative axis code to a named motion axis.
pub fn rel_to_axis(code: u16) -> Option<Axis> {
    match code {
        0 => Some(Axis::X),     // REL_X
        1 => Some(Axis::Y),     // REL_Y
        8 => Some(Axis::Wheel), // REL_WHEEL
        _ => None,
    }
}
