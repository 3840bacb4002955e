//! EventTranslator: raw device events to portable wire messages.
//!
//! `feed` is a pure state transition plus an optional emitted message. Each
//! capture loop owns its own translator, so translator state never crosses a
//! thread boundary.
//!
//! Keyboard policy: modifier transitions toggle the mask and emit nothing;
//! modifier state is queryable session state, not per-event traffic. Every
//! mapped non-modifier key transition emits one message; a press for a key
//! already tracked still emits (the remote side owns key-repeat dedup), a
//! release for an untracked key emits nothing.
//!
//! Pointer policy: relative motion maps 1:1 to messages, never coalesced, so
//! ordering and magnitude survive exactly. Button transitions emit with the
//! resolved identifier; unrecognized codes are dropped.

use inputlink_core::{KeyboardState, PointerState, ScanCodeTable, WireMessage};

use crate::infrastructure::device::{RawEvent, RawEventKind};

/// evdev key event values.
const KEY_RELEASE: i32 = 0;
const KEY_PRESS: i32 = 1;
const KEY_AUTOREPEAT: i32 = 2;

/// Translates raw events from one device into wire messages, maintaining the
/// HID report state for that device.
#[derive(Debug, Default)]
pub struct EventTranslator {
    keyboard: KeyboardState,
    pointer: PointerState,
}

impl EventTranslator {
    /// Creates a translator with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one raw event through the translator.
    ///
    /// Returns the message to forward, or `None` for unmapped and
    /// non-actionable events (which are dropped silently, never an error).
    pub fn feed(&mut self, event: &RawEvent) -> Option<WireMessage> {
        match event.kind {
            RawEventKind::Key => self.feed_key(event.code, event.value),
            RawEventKind::RelativeAxis => self.feed_motion(event.code, event.value),
        }
    }

    fn feed_key(&mut self, code: u32, value: i32) -> Option<WireMessage> {
        let code = u16::try_from(code).ok()?;

        if let Some(bit) = ScanCodeTable::modifier_bit(code) {
            match value {
                KEY_PRESS => self.keyboard.set_modifier(bit, true),
                KEY_RELEASE => self.keyboard.set_modifier(bit, false),
                _ => {}
            }
            return None;
        }

        if let Some(button) = ScanCodeTable::pointer_button(code) {
            let pressed = match value {
                KEY_PRESS => true,
                KEY_RELEASE => false,
                _ => return None,
            };
            self.pointer.set_button(button.mask_bit(), pressed);
            return Some(WireMessage::MouseButton { button, pressed });
        }

        let key = ScanCodeTable::to_portable(code)?;
        match value {
            KEY_PRESS | KEY_AUTOREPEAT => {
                self.keyboard.press(key.usage());
                Some(WireMessage::Keyboard {
                    code: key.usage(),
                    pressed: true,
                    key_name: key.name().to_string(),
                })
            }
            KEY_RELEASE => {
                if self.keyboard.release(key.usage()) {
                    Some(WireMessage::Keyboard {
                        code: key.usage(),
                        pressed: false,
                        key_name: key.name().to_string(),
                    })
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn feed_motion(&mut self, code: u32, value: i32) -> Option<WireMessage> {
        let axis = ScanCodeTable::relative_axis(u16::try_from(code).ok()?)?;
        Some(WireMessage::MouseMove { axis, value })
    }

    /// Current modifier mask (OR of active modifier bits).
    pub fn modifier_mask(&self) -> u8 {
        self.keyboard.modifier_mask()
    }

    /// Current pointer button mask.
    pub fn button_mask(&self) -> u8 {
        self.pointer.button_mask()
    }

    /// Current pressed-key slots in wire-report order.
    pub fn pressed_keys(&self) -> &[u8; inputlink_core::MAX_PRESSED_KEYS] {
        self.keyboard.pressed_keys()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
