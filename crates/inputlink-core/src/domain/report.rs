//! HID report state for the capture side.
//!
//! Mirrors the layout of a HID boot keyboard report: one modifier byte plus
//! six key slots. The slot array intentionally behaves like the wire report:
//! insertion takes the first empty slot and removal clears a slot without
//! compacting, so slot order is *not* press order once anything has been
//! released.

/// Modifier key bitmask, laid out like byte 0 of a HID boot keyboard report.
///
/// Bit layout:
/// - Bit 0: Left Ctrl
/// - Bit 1: Left Shift
/// - Bit 2: Left Alt
/// - Bit 3: Left Meta (Windows/Command/Super)
/// - Bit 4: Right Ctrl
/// - Bit 5: Right Shift
/// - Bit 6: Right Alt
/// - Bit 7: Right Meta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierFlags(pub u8);

impl ModifierFlags {
    pub const LEFT_CTRL: u8 = 1 << 0;
    pub const LEFT_SHIFT: u8 = 1 << 1;
    pub const LEFT_ALT: u8 = 1 << 2;
    pub const LEFT_META: u8 = 1 << 3;
    pub const RIGHT_CTRL: u8 = 1 << 4;
    pub const RIGHT_SHIFT: u8 = 1 << 5;
    pub const RIGHT_ALT: u8 = 1 << 6;
    pub const RIGHT_META: u8 = 1 << 7;

    /// Returns `true` if either Ctrl modifier is active.
    pub fn ctrl(&self) -> bool {
        self.0 & (Self::LEFT_CTRL | Self::RIGHT_CTRL) != 0
    }

    /// Returns `true` if either Shift modifier is active.
    pub fn shift(&self) -> bool {
        self.0 & (Self::LEFT_SHIFT | Self::RIGHT_SHIFT) != 0
    }

    /// Returns `true` if either Alt modifier is active.
    pub fn alt(&self) -> bool {
        self.0 & (Self::LEFT_ALT | Self::RIGHT_ALT) != 0
    }

    /// Returns `true` if either Meta (Win/Cmd/Super) modifier is active.
    pub fn meta(&self) -> bool {
        self.0 & (Self::LEFT_META | Self::RIGHT_META) != 0
    }
}

/// Maximum number of simultaneously tracked non-modifier keys, per the HID
/// boot report convention.
pub const MAX_PRESSED_KEYS: usize = 6;

/// Keyboard-side translator state: modifier mask plus the 6-slot pressed-key
/// array. A usage appears in at most one slot; slot value 0 means empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardState {
    modifier_mask: u8,
    pressed_keys: [u8; MAX_PRESSED_KEYS],
}

impl KeyboardState {
    /// Creates an empty state: no modifiers, no pressed keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or clears one modifier bit.
    pub fn set_modifier(&mut self, bit: u8, active: bool) {
        if active {
            self.modifier_mask |= bit;
        } else {
            self.modifier_mask &= !bit;
        }
    }

    /// Returns the current modifier mask.
    pub fn modifier_mask(&self) -> u8 {
        self.modifier_mask
    }

    /// Records a key press in the first empty slot.
    ///
    /// Returns `true` if the state changed. Pressing a usage that is already
    /// tracked is a no-op, as is pressing a seventh key while all slots are
    /// occupied (the report has nowhere to put it).
    pub fn press(&mut self, usage: u8) -> bool {
        if usage == 0 || self.is_pressed(usage) {
            return false;
        }
        for slot in self.pressed_keys.iter_mut() {
            if *slot == 0 {
                *slot = usage;
                return true;
            }
        }
        false
    }

    /// Clears the slot holding `usage`, leaving the other slots untouched.
    ///
    /// Returns `true` if the usage was tracked. Releasing an untracked usage
    /// is a no-op.
    pub fn release(&mut self, usage: u8) -> bool {
        for slot in self.pressed_keys.iter_mut() {
            if *slot == usage && usage != 0 {
                *slot = 0;
                return true;
            }
        }
        false
    }

    /// Returns `true` if `usage` occupies a slot.
    pub fn is_pressed(&self, usage: u8) -> bool {
        usage != 0 && self.pressed_keys.contains(&usage)
    }

    /// Returns the raw slot array in wire-report order.
    pub fn pressed_keys(&self) -> &[u8; MAX_PRESSED_KEYS] {
        &self.pressed_keys
    }
}

/// Pointer-side translator state.
///
/// Only button state is tracked; relative deltas are per-event and never
/// accumulated here; one raw motion event becomes exactly one wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerState {
    button_mask: u8,
}

impl PointerState {
    /// Creates a state with no buttons held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or clears one button bit (bit 0 = left, bit 1 = right, bit 2 = middle).
    pub fn set_button(&mut self, bit: u8, pressed: bool) {
        if pressed {
            self.button_mask |= bit;
        } else {
            self.button_mask &= !bit;
        }
    }

    /// Returns the current button mask.
    pub fn button_mask(&self) -> u8 {
        self.button_mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── ModifierFlags ────────────────────────────────────────────────────────

    #[test]
    fn test_modifier_predicates_cover_both_sides() {
        assert!(ModifierFlags(ModifierFlags::LEFT_CTRL).ctrl());
        assert!(ModifierFlags(ModifierFlags::RIGHT_CTRL).ctrl());
        assert!(ModifierFlags(ModifierFlags::LEFT_SHIFT).shift());
        assert!(ModifierFlags(ModifierFlags::RIGHT_ALT).alt());
        assert!(ModifierFlags(ModifierFlags::RIGHT_META).meta());
        assert!(!ModifierFlags::default().ctrl());
    }

    // ── KeyboardState slots ──────────────────────────────────────────────────

    #[test]
    fn test_press_takes_first_empty_slot() {
        let mut state = KeyboardState::new();
        assert!(state.press(0x04));
        assert!(state.press(0x05));
        assert_eq!(state.pressed_keys(), &[0x04, 0x05, 0, 0, 0, 0]);
    }

    #[test]
    fn test_duplicate_press_is_a_no_op() {
        let mut state = KeyboardState::new();
        assert!(state.press(0x04));
        assert!(!state.press(0x04));
        assert_eq!(state.pressed_keys(), &[0x04, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_release_clears_slot_without_compaction() {
        // press(A), press(B), release(A): B stays in its original slot and
        // A's slot goes back to zero.
        let mut state = KeyboardState::new();
        state.press(0x04); // A
        state.press(0x05); // B
        assert!(state.release(0x04));
        assert_eq!(state.pressed_keys(), &[0, 0x05, 0, 0, 0, 0]);
    }

    #[test]
    fn test_release_of_untracked_key_is_a_no_op() {
        let mut state = KeyboardState::new();
        state.press(0x04);
        assert!(!state.release(0x2C));
        assert_eq!(state.pressed_keys(), &[0x04, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_seventh_simultaneous_key_is_dropped() {
        let mut state = KeyboardState::new();
        for usage in 0x04..0x0A {
            assert!(state.press(usage));
        }
        assert!(!state.press(0x0A));
        assert!(!state.is_pressed(0x0A));
        assert_eq!(state.pressed_keys().iter().filter(|&&k| k != 0).count(), 6);
    }

    #[test]
    fn test_freed_slot_is_reused_by_next_press() {
        let mut state = KeyboardState::new();
        state.press(0x04);
        state.press(0x05);
        state.release(0x04);
        assert!(state.press(0x06));
        // First empty slot is slot 0, vacated by A.
        assert_eq!(state.pressed_keys(), &[0x06, 0x05, 0, 0, 0, 0]);
    }

    #[test]
    fn test_no_duplicates_under_press_release_sequences() {
        let mut state = KeyboardState::new();
        for _ in 0..10 {
            state.press(0x1D);
            state.press(0x1D);
            state.release(0x1D);
        }
        assert!(!state.is_pressed(0x1D));
        assert_eq!(state.pressed_keys(), &[0u8; 6]);
    }

    // ── Modifier mask ────────────────────────────────────────────────────────

    #[test]
    fn test_set_modifier_toggles_bits_independently() {
        let mut state = KeyboardState::new();
        state.set_modifier(ModifierFlags::LEFT_CTRL, true);
        state.set_modifier(ModifierFlags::LEFT_SHIFT, true);
        assert_eq!(state.modifier_mask(), 0b0000_0011);
        state.set_modifier(ModifierFlags::LEFT_CTRL, false);
        assert_eq!(state.modifier_mask(), 0b0000_0010);
    }

    // ── PointerState ─────────────────────────────────────────────────────────

    #[test]
    fn test_button_mask_tracks_press_and_release() {
        let mut state = PointerState::new();
        state.set_button(1 << 0, true); // left
        state.set_button(1 << 2, true); // middle
        assert_eq!(state.button_mask(), 0b101);
        state.set_button(1 << 0, false);
        assert_eq!(state.button_mask(), 0b100);
    }
}
