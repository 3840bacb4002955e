//! All inputlink wire message types.
//!
//! Messages travel as length-prefixed UTF-8 JSON frames (see
//! [`crate::protocol::codec`]). The JSON shape is the external contract: a
//! `"type"` discriminant plus per-variant fields, e.g.
//!
//! ```json
//! {"type":"keyboard","code":4,"pressed":true,"key_name":"KeyA"}
//! {"type":"mouse_move","axis":"x","value":-3}
//! ```

use serde::{Deserialize, Serialize};

/// Relative motion axis of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Wheel,
}

impl Axis {
    /// Returns the wire name of the axis.
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Wheel => "wheel",
        }
    }
}

/// Named pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

impl PointerButton {
    /// Returns the wire name of the button.
    pub fn as_str(self) -> &'static str {
        match self {
            PointerButton::Left => "left",
            PointerButton::Right => "right",
            PointerButton::Middle => "middle",
        }
    }

    /// Returns the button's bit in [`crate::domain::report::PointerState`]'s
    /// button mask (bit 0 = left, bit 1 = right, bit 2 = middle).
    pub fn mask_bit(self) -> u8 {
        match self {
            PointerButton::Left => 1 << 0,
            PointerButton::Right => 1 << 1,
            PointerButton::Middle => 1 << 2,
        }
    }
}

/// All valid inputlink messages, discriminated by the JSON `"type"` field.
///
/// A message is created by the event translator (or the session, for
/// `Connected` and `Ping`) and consumed exactly once by the framed channel on
/// send; nothing is shared across threads after the handoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// Stream preamble, sent once per connection before any capture traffic.
    Connected {
        /// Human-readable identification of the forwarding host.
        message: String,
    },
    /// A non-modifier key transition.
    Keyboard {
        /// HID usage ID (page 0x07).
        code: u8,
        /// `true` on press (including autorepeat), `false` on release.
        pressed: bool,
        /// DOM-style key name, for receiver-side logging.
        key_name: String,
    },
    /// One relative motion event. Never coalesced: N raw motion events on the
    /// capture side yield N of these, in order.
    MouseMove {
        axis: Axis,
        value: i32,
    },
    /// A pointer button transition.
    MouseButton {
        button: PointerButton,
        pressed: bool,
    },
    /// Liveness probe emitted by the connection monitor.
    Ping {
        /// Seconds since the Unix epoch at time of generation.
        time: f64,
    },
}

impl WireMessage {
    /// Returns the wire `"type"` discriminant for this message.
    pub fn type_name(&self) -> &'static str {
        match self {
            WireMessage::Connected { .. } => "connected",
            WireMessage::Keyboard { .. } => "keyboard",
            WireMessage::MouseMove { .. } => "mouse_move",
            WireMessage::MouseButton { .. } => "mouse_button",
            WireMessage::Ping { .. } => "ping",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_message_json_shape() {
        let msg = WireMessage::Keyboard {
            code: 0x04,
            pressed: true,
            key_name: "KeyA".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "keyboard");
        assert_eq!(json["code"], 4);
        assert_eq!(json["pressed"], true);
        assert_eq!(json["key_name"], "KeyA");
    }

    #[test]
    fn test_mouse_move_message_json_shape() {
        let msg = WireMessage::MouseMove {
            axis: Axis::Wheel,
            value: -3,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "mouse_move");
        assert_eq!(json["axis"], "wheel");
        assert_eq!(json["value"], -3);
    }

    #[test]
    fn test_mouse_button_message_json_shape() {
        let msg = WireMessage::MouseButton {
            button: PointerButton::Middle,
            pressed: false,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "mouse_button");
        assert_eq!(json["button"], "middle");
        assert_eq!(json["pressed"], false);
    }

    #[test]
    fn test_connected_and_ping_json_shapes() {
        let hello = WireMessage::Connected {
            message: "sender ready".to_string(),
        };
        let json = serde_json::to_value(&hello).unwrap();
        assert_eq!(json["type"], "connected");
        assert_eq!(json["message"], "sender ready");

        let ping = WireMessage::Ping { time: 1234.5 };
        let json = serde_json::to_value(&ping).unwrap();
        assert_eq!(json["type"], "ping");
        assert_eq!(json["time"], 1234.5);
    }

    #[test]
    fn test_type_name_matches_serialized_tag() {
        let messages = [
            WireMessage::Connected { message: String::new() },
            WireMessage::Keyboard { code: 0, pressed: false, key_name: String::new() },
            WireMessage::MouseMove { axis: Axis::X, value: 0 },
            WireMessage::MouseButton { button: PointerButton::Left, pressed: true },
            WireMessage::Ping { time: 0.0 },
        ];
        for msg in &messages {
            let json = serde_json::to_value(msg).unwrap();
            assert_eq!(json["type"], msg.type_name());
        }
    }

    #[test]
    fn test_wire_names_match_serde_renames() {
        assert_eq!(serde_json::to_value(Axis::Wheel).unwrap(), Axis::Wheel.as_str());
        assert_eq!(serde_json::to_value(Axis::X).unwrap(), Axis::X.as_str());
        assert_eq!(
            serde_json::to_value(PointerButton::Right).unwrap(),
            PointerButton::Right.as_str()
        );
        assert_eq!(
            serde_json::to_value(PointerButton::Middle).unwrap(),
            PointerButton::Middle.as_str()
        );
    }

    #[test]
    fn test_button_mask_bits_are_distinct() {
        assert_eq!(PointerButton::Left.mask_bit(), 0b001);
        assert_eq!(PointerButton::Right.mask_bit(), 0b010);
        assert_eq!(PointerButton::Middle.mask_bit(), 0b100);
    }
}
