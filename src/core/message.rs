// src/core/message.rs

use super::error::DenseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The 2-bit classical message Alice sends, written `b1 b2`.
///
/// `b1` is the first character of the symbol and the high bit of
/// [`Message::index`]. Serialized as its 2-character symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Message {
    /// `00`
    Zero,
    /// `01`
    One,
    /// `10`
    Two,
    /// `11`
    Three,
}

impl Message {
    /// All four messages in basis order.
    pub const ALL: [Message; 4] = [Message::Zero, Message::One, Message::Two, Message::Three];

    /// Builds a message from its two bits `(b1, b2)`.
    pub fn from_bits(b1: bool, b2: bool) -> Self {
        Self::ALL[((b1 as usize) << 1) | b2 as usize]
    }

    /// Builds a message from its numeric value `0..=3`.
    pub fn from_index(index: usize) -> Result<Self, DenseError> {
        Self::ALL.get(index).copied().ok_or_else(|| {
            DenseError::invalid_argument(format!("message index {} is outside 0..=3", index))
        })
    }

    /// Numeric value, `b1 * 2 + b2`.
    pub fn index(self) -> usize {
        match self {
            Message::Zero => 0,
            Message::One => 1,
            Message::Two => 2,
            Message::Three => 3,
        }
    }

    /// First bit of the symbol. Selects the Z gate during encoding.
    pub fn high_bit(self) -> bool {
        self.index() & 0b10 != 0
    }

    /// Second bit of the symbol. Selects the X gate during encoding.
    pub fn low_bit(self) -> bool {
        self.index() & 0b01 != 0
    }

    /// The bits `[b1, b2]` in transmission order.
    pub fn bits(self) -> [bool; 2] {
        [self.high_bit(), self.low_bit()]
    }

    /// The 2-character symbol, e.g. `"10"`.
    pub fn symbol(self) -> &'static str {
        match self {
            Message::Zero => "00",
            Message::One => "01",
            Message::Two => "10",
            Message::Three => "11",
        }
    }
}

impl FromStr for Message {
    type Err = DenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "00" => Ok(Message::Zero),
            "01" => Ok(Message::One),
            "10" => Ok(Message::Two),
            "11" => Ok(Message::Three),
            other => Err(DenseError::invalid_argument(format!(
                "'{}' is not a 2-bit message; expected one of 00, 01, 10, 11",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Message {
    type Error = DenseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Message> for String {
    fn from(message: Message) -> Self {
        message.symbol().to_string()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A computational basis state `|ab>` of the register, `a` being Alice's bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BasisState(u8);

impl BasisState {
    /// The four basis states in index order `|00>, |01>, |10>, |11>`.
    pub const ALL: [BasisState; 4] = [BasisState(0), BasisState(1), BasisState(2), BasisState(3)];

    /// Basis state for a vector index `0..=3`.
    pub fn new(index: usize) -> Result<Self, DenseError> {
        if index < Self::ALL.len() {
            Ok(BasisState(index as u8))
        } else {
            Err(DenseError::invalid_argument(format!("basis index {} is outside 0..=3", index)))
        }
    }

    /// Index of this state in the amplitude vector.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Alice's bit of the label.
    pub fn alice_bit(self) -> bool {
        self.0 & 0b10 != 0
    }

    /// Bob's bit of the label.
    pub fn bob_bit(self) -> bool {
        self.0 & 0b01 != 0
    }

    /// The message that has the same bit pattern as this outcome.
    pub fn to_message(self) -> Message {
        Message::ALL[self.index()]
    }
}

impl From<Message> for BasisState {
    fn from(message: Message) -> Self {
        BasisState(message.index() as u8)
    }
}

impl FromStr for BasisState {
    type Err = DenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().trim_start_matches('|').trim_end_matches('>');
        Message::from_str(label).map(BasisState::from)
    }
}

impl TryFrom<String> for BasisState {
    type Error = DenseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BasisState> for String {
    fn from(state: BasisState) -> Self {
        state.to_message().symbol().to_string()
    }
}

impl fmt::Display for BasisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_message().symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_symbols() {
        for message in Message::ALL {
            assert_eq!(message.symbol().parse::<Message>().unwrap(), message);
        }
    }

    #[test]
    fn rejects_malformed_symbols() {
        for bad in ["", "0", "2", "012", "ab", "1 1"] {
            assert!(matches!(bad.parse::<Message>(), Err(DenseError::InvalidArgument { .. })), "{:?}", bad);
        }
    }

    #[test]
    fn bit_order_is_b1_then_b2() {
        let m: Message = "10".parse().unwrap();
        assert!(m.high_bit());
        assert!(!m.low_bit());
        assert_eq!(m.bits(), [true, false]);
        assert_eq!(Message::from_bits(false, true), Message::One);
    }

    #[test]
    fn basis_labels_put_alice_first() {
        let s = BasisState::new(2).unwrap();
        assert!(s.alice_bit());
        assert!(!s.bob_bit());
        assert_eq!(s.to_string(), "10");
        assert_eq!("|01>".parse::<BasisState>().unwrap(), BasisState::new(1).unwrap());
        assert!(BasisState::new(4).is_err());
    }

    #[test]
    fn serializes_as_symbol() {
        let json = serde_json::to_string(&Message::Three).unwrap();
        assert_eq!(json, "\"11\"");
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Message::Three);
        assert!(serde_json::from_str::<Message>("\"12\"").is_err());
    }
}
