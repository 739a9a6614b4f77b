//! Wire format of the status board.
//!
//! The board takes one ASCII command per update: `r<r>y<y>g<g>x<x>;` where each
//! value is a decimal bitmask over the eight channels (bit n = channel n).
//! `r`, `y` and `g` light the lamp in that color, `x` marks the channel as running.

use channels::ChannelState;
use status::Color;

/// Sent by discovery to ask a port whether a board is attached.
pub const CHALLENGE: &[u8] = b"?";
/// Every board reply to the challenge starts with this.
pub const RESPONSE_PREFIX: &str = "!xfd";
/// Bytes to collect before the reply is inspected.
pub const RESPONSE_MIN_LEN: usize = 8;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Masks {
    pub red: u8,
    pub yellow: u8,
    pub green: u8,
    pub running: u8,
}

impl Masks {
    pub fn from_channels(channels: &ChannelState) -> Masks {
        let mut masks = Masks::default();
        for (ch, status) in channels.iter().enumerate() {
            let bit = 1u8 << ch;
            match status.color {
                Color::Red => masks.red |= bit,
                Color::Yellow => masks.yellow |= bit,
                Color::Green => masks.green |= bit,
                Color::Blank => {}
            }
            if status.running {
                masks.running |= bit;
            }
        }
        masks
    }

    pub fn to_command(&self) -> String {
        format!(
            "r{}y{}g{}x{};",
            self.red, self.yellow, self.green, self.running
        )
    }

    /// Masks as 8-bit binary strings, for debug logging.
    pub fn describe(&self) -> String {
        format!(
            "r:{:08b} y:{:08b} g:{:08b} x:{:08b}",
            self.red, self.yellow, self.green, self.running
        )
    }
}

pub fn encode(channels: &ChannelState) -> Vec<u8> {
    Masks::from_channels(channels).to_command().into_bytes()
}

/// Whether the bytes read back after a challenge identify a status board.
pub fn is_board_response(response: &[u8]) -> bool {
    if response.len() < RESPONSE_MIN_LEN {
        return false;
    }
    String::from_utf8_lossy(response).starts_with(RESPONSE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use channels::CHANNEL_COUNT;
    use status::Status;

    fn state_with(entries: &[(usize, Status)]) -> ChannelState {
        let mut channels = [Status::BLANK; CHANNEL_COUNT];
        for &(ch, status) in entries {
            channels[ch] = status;
        }
        ChannelState::new(channels)
    }

    #[test]
    fn all_blank_encodes_zero_masks() {
        assert_eq!(encode(&ChannelState::default()), b"r0y0g0x0;".to_vec());
    }

    #[test]
    fn channel_index_is_bit_position() {
        let state = state_with(&[
            (3, Status::new(Color::Red, false)),
            (5, Status::new(Color::Green, true)),
        ]);

        assert_eq!(String::from_utf8(encode(&state)).unwrap(), "r8y0g32x32;");
    }

    #[test]
    fn overview_and_last_channel_use_outer_bits() {
        let state = state_with(&[
            (0, Status::new(Color::Yellow, true)),
            (7, Status::new(Color::Yellow, false)),
        ]);

        let masks = Masks::from_channels(&state);

        assert_eq!(masks.yellow, 0b1000_0001);
        assert_eq!(masks.running, 1);
        assert_eq!(masks.to_command(), "r0y129g0x1;");
    }

    #[test]
    fn blank_running_sets_only_running_bit() {
        let state = state_with(&[(2, Status::new(Color::Blank, true))]);
        assert_eq!(
            Masks::from_channels(&state),
            Masks {
                running: 4,
                ..Masks::default()
            }
        );
    }

    #[test]
    fn all_red_running_is_full_masks() {
        let state = ChannelState::new([Status::new(Color::Red, true); CHANNEL_COUNT]);
        assert_eq!(
            String::from_utf8(encode(&state)).unwrap(),
            "r255y0g0x255;"
        );
    }

    #[test]
    fn describe_renders_binary() {
        let masks = Masks {
            red: 8,
            yellow: 0,
            green: 32,
            running: 255,
        };
        assert_eq!(
            masks.describe(),
            "r:00001000 y:00000000 g:00100000 x:11111111"
        );
    }

    #[test]
    fn board_response_needs_prefix_and_length() {
        assert!(is_board_response(b"!xfdOK\r\n"));
        assert!(is_board_response(b"!xfd v1.2 ready"));
        assert!(!is_board_response(b"?xfdOK\r\n"));
        assert!(!is_board_response(b""));
    }

    #[test]
    fn six_byte_reply_is_below_minimum() {
        // A bare "!xfdOK" has the prefix but not the eight bytes the board always sends.
        assert!(!is_board_response(b"!xfdOK"));
        assert!(is_board_response(b"!xfdOK\r\n"));
    }
}
