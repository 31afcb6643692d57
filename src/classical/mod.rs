// src/classical/mod.rs

//! Classical repetition code used as the comparison track.
//!
//! Each message bit is repeated `k` times (`k` odd), sent through a binary
//! symmetric channel that flips each bit independently, and recovered by
//! majority vote. Besides the corrected bits, decoding reports per group
//! whether any received bit disagreed with the majority, which is what the
//! presentation layer shows as "error corrected".

use crate::core::constants::dense_constants::{MAX_REPETITION_FACTOR, MESSAGE_BITS};
use crate::core::{DenseError, Message};
use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of transmitted bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassicalBuffer {
    bits: Vec<bool>,
}

impl ClassicalBuffer {
    /// Wraps raw bits.
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// The raw bits of a message, `[b1, b2]`.
    pub fn from_message(message: Message) -> Self {
        Self { bits: message.bits().to_vec() }
    }

    /// Read-only access to the bits.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` if the buffer holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Indices where `self` and `other` differ. Bits past the shorter buffer are ignored.
    pub fn flipped_positions(&self, other: &ClassicalBuffer) -> Vec<usize> {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Display for ClassicalBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Output of majority decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedBits {
    /// Majority value of each group.
    pub bits: Vec<bool>,
    /// Per group, `true` when at least one bit disagreed with the majority.
    pub parity_flags: Vec<bool>,
}

impl DecodedBits {
    /// Number of groups that needed correction.
    pub fn corrected_groups(&self) -> usize {
        self.parity_flags.iter().filter(|flag| **flag).count()
    }

    /// Interprets the decoded bits as a 2-bit message.
    ///
    /// # Errors
    /// `DenseError::InvalidArgument` unless exactly two groups were decoded.
    pub fn message(&self) -> Result<Message, DenseError> {
        match self.bits.as_slice() {
            [b1, b2] => Ok(Message::from_bits(*b1, *b2)),
            other => Err(DenseError::invalid_argument(format!(
                "decoded {} bit(s); a message has exactly {}",
                other.len(),
                MESSAGE_BITS
            ))),
        }
    }
}

pub(crate) fn validate_factor(repetition_factor: usize) -> Result<(), DenseError> {
    if repetition_factor < 1 {
        return Err(DenseError::invalid_argument("repetition factor must be at least 1"));
    }
    if repetition_factor % 2 == 0 {
        return Err(DenseError::invalid_argument(format!(
            "repetition factor {} is even; majority vote needs an odd factor",
            repetition_factor
        )));
    }
    if repetition_factor > MAX_REPETITION_FACTOR {
        return Err(DenseError::invalid_argument(format!(
            "repetition factor {} exceeds the maximum of {}",
            repetition_factor, MAX_REPETITION_FACTOR
        )));
    }
    Ok(())
}

fn validate_probability(flip_probability: f64) -> Result<(), DenseError> {
    // Written so that NaN fails too.
    if !(0.0..=1.0).contains(&flip_probability) {
        return Err(DenseError::invalid_argument(format!(
            "flip probability {} is outside [0, 1]",
            flip_probability
        )));
    }
    Ok(())
}

/// Repeats each message bit `repetition_factor` times.
///
/// # Errors
/// `DenseError::InvalidArgument` if the factor is zero, even, or above
/// `MAX_REPETITION_FACTOR`.
pub fn encode(message: Message, repetition_factor: usize) -> Result<ClassicalBuffer, DenseError> {
    validate_factor(repetition_factor)?;
    let bits: Vec<bool> = message
        .bits()
        .iter()
        .flat_map(|bit| std::iter::repeat_n(*bit, repetition_factor))
        .collect();
    let buffer = ClassicalBuffer::new(bits);
    debug!("encoded {} with k={} as {}", message, repetition_factor, buffer);
    Ok(buffer)
}

/// Sends `buffer` through a binary symmetric channel.
///
/// Each bit flips independently with probability `flip_probability`, drawn
/// from `rng`. The input is left untouched.
///
/// # Errors
/// `DenseError::InvalidArgument` if `flip_probability` is outside `[0, 1]`.
pub fn transmit<R: Rng + ?Sized>(
    buffer: &ClassicalBuffer,
    flip_probability: f64,
    rng: &mut R,
) -> Result<ClassicalBuffer, DenseError> {
    validate_probability(flip_probability)?;
    let bits: Vec<bool> = buffer
        .bits
        .iter()
        .map(|bit| if rng.random_bool(flip_probability) { !*bit } else { *bit })
        .collect();
    let received = ClassicalBuffer::new(bits);
    trace!("channel p={}: {} -> {}", flip_probability, buffer, received);
    Ok(received)
}

/// Parity flags alone: per group, whether any bit disagrees with the group majority.
///
/// # Errors
/// Same as [`decode`].
pub fn check_parity(buffer: &ClassicalBuffer, repetition_factor: usize) -> Result<Vec<bool>, DenseError> {
    decode(buffer, repetition_factor).map(|decoded| decoded.parity_flags)
}

/// Majority-decodes `buffer` in groups of `repetition_factor`.
///
/// # Errors
/// `DenseError::InvalidArgument` if the factor is invalid or the buffer length
/// is not a multiple of it.
pub fn decode(buffer: &ClassicalBuffer, repetition_factor: usize) -> Result<DecodedBits, DenseError> {
    validate_factor(repetition_factor)?;
    if buffer.len() % repetition_factor != 0 {
        return Err(DenseError::invalid_argument(format!(
            "buffer of {} bit(s) does not split into groups of {}",
            buffer.len(),
            repetition_factor
        )));
    }

    let groups = buffer.len() / repetition_factor;
    let mut bits = Vec::with_capacity(groups);
    let mut parity_flags = Vec::with_capacity(groups);
    for group in buffer.bits.chunks(repetition_factor) {
        let ones = group.iter().filter(|bit| **bit).count();
        let majority = ones * 2 > repetition_factor;
        bits.push(majority);
        parity_flags.push(ones != 0 && ones != repetition_factor);
    }
    let decoded = DecodedBits { bits, parity_flags };
    debug!("decoded {} with k={}: {:?}", buffer, repetition_factor, decoded);
    Ok(decoded)
}

/// A repetition code with a validated factor.
///
/// Deserialization goes through [`RepetitionCodec::new`], so a codec read
/// from JSON holds the same guarantees as one built in code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCodec")]
pub struct RepetitionCodec {
    repetition_factor: usize,
}

#[derive(Deserialize)]
struct RawCodec {
    repetition_factor: usize,
}

impl TryFrom<RawCodec> for RepetitionCodec {
    type Error = DenseError;

    fn try_from(raw: RawCodec) -> Result<Self, Self::Error> {
        RepetitionCodec::new(raw.repetition_factor)
    }
}

impl RepetitionCodec {
    /// Creates a codec.
    ///
    /// # Errors
    /// `DenseError::InvalidArgument` if the factor is zero, even, or above
    /// `MAX_REPETITION_FACTOR`.
    pub fn new(repetition_factor: usize) -> Result<Self, DenseError> {
        validate_factor(repetition_factor)?;
        Ok(Self { repetition_factor })
    }

    /// The repetition factor `k`.
    pub fn repetition_factor(&self) -> usize {
        self.repetition_factor
    }

    /// Length of an encoded message.
    pub fn encoded_len(&self) -> usize {
        MESSAGE_BITS * self.repetition_factor
    }

    /// See [`encode`].
    pub fn encode(&self, message: Message) -> Result<ClassicalBuffer, DenseError> {
        encode(message, self.repetition_factor)
    }

    /// See [`check_parity`].
    pub fn check_parity(&self, buffer: &ClassicalBuffer) -> Result<Vec<bool>, DenseError> {
        check_parity(buffer, self.repetition_factor)
    }

    /// See [`decode`].
    pub fn decode(&self, buffer: &ClassicalBuffer) -> Result<DecodedBits, DenseError> {
        decode(buffer, self.repetition_factor)
    }

    /// Encode, transmit and decode in one go, returning the recovered message.
    pub fn round_trip<R: Rng + ?Sized>(
        &self,
        message: Message,
        flip_probability: f64,
        rng: &mut R,
    ) -> Result<Message, DenseError> {
        let sent = self.encode(message)?;
        let received = transmit(&sent, flip_probability, rng)?;
        self.decode(&received)?.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn buffer(s: &str) -> ClassicalBuffer {
        ClassicalBuffer::new(s.chars().map(|c| c == '1').collect())
    }

    #[test]
    fn encode_repeats_each_bit() -> Result<(), DenseError> {
        assert_eq!(encode(Message::One, 3)?.to_string(), "000111");
        assert_eq!(encode(Message::Two, 1)?.to_string(), "10");
        assert_eq!(encode(Message::Three, 5)?.len(), 10);
        Ok(())
    }

    #[test]
    fn encode_rejects_zero_and_even_factors() {
        for k in [0, 2, 4] {
            assert!(matches!(encode(Message::Zero, k), Err(DenseError::InvalidArgument { .. })), "k={}", k);
        }
        assert!(RepetitionCodec::new(2).is_err());
    }

    #[test]
    fn oversized_factors_are_rejected() {
        assert!(RepetitionCodec::new(MAX_REPETITION_FACTOR).is_ok());
        assert!(matches!(
            RepetitionCodec::new(MAX_REPETITION_FACTOR + 2),
            Err(DenseError::InvalidArgument { .. })
        ));
        assert!(matches!(encode(Message::One, usize::MAX), Err(DenseError::InvalidArgument { .. })));
        assert!(matches!(decode(&buffer("01"), usize::MAX), Err(DenseError::InvalidArgument { .. })));
    }

    #[test]
    fn deserialized_codec_is_validated() -> Result<(), DenseError> {
        let codec: RepetitionCodec = serde_json::from_str(r#"{"repetition_factor":5}"#)?;
        assert_eq!(codec.repetition_factor(), 5);
        for bad in [r#"{"repetition_factor":4}"#, r#"{"repetition_factor":0}"#] {
            assert!(serde_json::from_str::<RepetitionCodec>(bad).is_err(), "{}", bad);
        }
        Ok(())
    }

    #[test]
    fn single_flip_per_group_is_corrected_and_flagged() -> Result<(), DenseError> {
        let decoded = decode(&buffer("010110"), 3)?;
        assert_eq!(decoded.message()?, Message::One);
        assert_eq!(decoded.parity_flags, vec![true, true]);
        assert_eq!(decoded.corrected_groups(), 2);
        Ok(())
    }

    #[test]
    fn clean_groups_are_not_flagged() -> Result<(), DenseError> {
        let decoded = decode(&buffer("111000"), 3)?;
        assert_eq!(decoded.message()?, Message::Two);
        assert_eq!(decoded.parity_flags, vec![false, false]);
        Ok(())
    }

    #[test]
    fn two_flips_in_a_group_defeat_majority() -> Result<(), DenseError> {
        let decoded = decode(&buffer("110000"), 3)?;
        assert_eq!(decoded.message()?, Message::Two);
        assert_eq!(decoded.parity_flags, vec![true, false]);
        Ok(())
    }

    #[test]
    fn misaligned_buffer_is_rejected() {
        assert!(matches!(decode(&buffer("0101"), 3), Err(DenseError::InvalidArgument { .. })));
        assert!(matches!(decode(&buffer("000"), 3).and_then(|d| d.message()), Err(DenseError::InvalidArgument { .. })));
    }

    #[test]
    fn transmit_validates_probability() {
        let mut rng = StdRng::seed_from_u64(1);
        let b = buffer("000");
        assert!(transmit(&b, -0.1, &mut rng).is_err());
        assert!(transmit(&b, 1.5, &mut rng).is_err());
        assert!(transmit(&b, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn transmit_extremes() -> Result<(), DenseError> {
        let mut rng = StdRng::seed_from_u64(9);
        let b = buffer("000111");
        assert_eq!(transmit(&b, 0.0, &mut rng)?, b);
        let flipped = transmit(&b, 1.0, &mut rng)?;
        assert_eq!(flipped.to_string(), "111000");
        assert_eq!(b.flipped_positions(&flipped), vec![0, 1, 2, 3, 4, 5]);
        Ok(())
    }

    #[test]
    fn transmit_is_reproducible_with_seed() -> Result<(), DenseError> {
        let b = encode(Message::Three, 9)?;
        let a = transmit(&b, 0.3, &mut StdRng::seed_from_u64(5))?;
        let c = transmit(&b, 0.3, &mut StdRng::seed_from_u64(5))?;
        assert_eq!(a, c);
        Ok(())
    }

    #[test]
    fn codec_round_trip_without_noise() -> Result<(), DenseError> {
        let mut rng = StdRng::seed_from_u64(0);
        for k in [1, 3, 5, 7] {
            let codec = RepetitionCodec::new(k)?;
            assert_eq!(codec.encoded_len(), 2 * k);
            for m in Message::ALL {
                assert_eq!(codec.round_trip(m, 0.0, &mut rng)?, m);
            }
        }
        Ok(())
    }
}
