//! Key/value dictionaries exchanged with the companion
//!
//! Payload layout:
//! - COUNT (1 byte): number of tuples
//! - COUNT × TUPLE (8 bytes each): key as u32 LE, value as i32 LE
//!
//! Tuples keep arrival order. Order matters: a setup-info request is
//! recognised by being the first tuple.

use heapless::Vec;

use crate::keys::MessageKey;

/// Maximum tuples per dictionary
pub const MAX_TUPLES: usize = 16;

/// Encoded size of a single tuple
pub const TUPLE_SIZE: usize = 8;

/// Maximum encoded dictionary size (COUNT + tuples)
pub const MAX_ENCODED_SIZE: usize = 1 + MAX_TUPLES * TUPLE_SIZE;

/// Errors from building or decoding a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DictionaryError {
    /// More tuples than [`MAX_TUPLES`]
    TooManyTuples,
    /// Payload ended in the middle of a tuple
    Truncated,
    /// Bytes left over after the declared tuples
    TrailingBytes,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

/// One key/value pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tuple {
    /// Raw wire key (may be unknown to this build)
    pub key: u32,
    /// Value
    pub value: i32,
}

impl Tuple {
    /// Decode the key, if this build knows it
    pub fn message_key(&self) -> Option<MessageKey> {
        MessageKey::from_u32(self.key)
    }
}

/// An ordered set of tuples
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dictionary {
    tuples: Vec<Tuple, MAX_TUPLES>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self { tuples: Vec::new() }
    }

    /// Build a dictionary from raw `(key, value)` pairs
    pub fn from_pairs(pairs: &[(u32, i32)]) -> Result<Self, DictionaryError> {
        let mut dict = Self::new();
        for &(key, value) in pairs {
            dict.push_raw(key, value)?;
        }
        Ok(dict)
    }

    /// Append a tuple with a known key
    pub fn push(&mut self, key: MessageKey, value: i32) -> Result<(), DictionaryError> {
        self.push_raw(key.to_u32(), value)
    }

    /// Append a tuple with a raw key
    pub fn push_raw(&mut self, key: u32, value: i32) -> Result<(), DictionaryError> {
        self.tuples
            .push(Tuple { key, value })
            .map_err(|_| DictionaryError::TooManyTuples)
    }

    /// First tuple, if any
    pub fn first(&self) -> Option<&Tuple> {
        self.tuples.first()
    }

    /// Value of the first tuple with `key`
    pub fn get(&self, key: MessageKey) -> Option<i32> {
        let raw = key.to_u32();
        self.tuples.iter().find(|t| t.key == raw).map(|t| t.value)
    }

    /// Iterate tuples in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Tuple> {
        self.tuples.iter()
    }

    /// Number of tuples
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// Returns true if there are no tuples
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Size of the encoded form in bytes
    pub fn encoded_len(&self) -> usize {
        1 + self.tuples.len() * TUPLE_SIZE
    }

    /// Encode into `buffer`
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, DictionaryError> {
        let len = self.encoded_len();
        if buffer.len() < len {
            return Err(DictionaryError::BufferTooSmall);
        }

        buffer[0] = self.tuples.len() as u8;
        for (i, tuple) in self.tuples.iter().enumerate() {
            let at = 1 + i * TUPLE_SIZE;
            buffer[at..at + 4].copy_from_slice(&tuple.key.to_le_bytes());
            buffer[at + 4..at + 8].copy_from_slice(&tuple.value.to_le_bytes());
        }

        Ok(len)
    }

    /// Decode from a payload produced by [`Dictionary::encode`]
    pub fn decode(bytes: &[u8]) -> Result<Self, DictionaryError> {
        let (&count, body) = bytes.split_first().ok_or(DictionaryError::Truncated)?;
        let count = count as usize;

        if count > MAX_TUPLES {
            return Err(DictionaryError::TooManyTuples);
        }
        if body.len() < count * TUPLE_SIZE {
            return Err(DictionaryError::Truncated);
        }
        if body.len() > count * TUPLE_SIZE {
            return Err(DictionaryError::TrailingBytes);
        }

        let mut dict = Self::new();
        for chunk in body.chunks_exact(TUPLE_SIZE) {
            let key = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            let value = i32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
            dict.push_raw(key, value)?;
        }

        Ok(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let dict = Dictionary::from_pairs(&[(2, 1), (4, -1)]).unwrap();
        let mut buffer = [0u8; 32];
        let len = dict.encode(&mut buffer).unwrap();

        assert_eq!(len, 17);
        assert_eq!(buffer[0], 2); // count
        assert_eq!(&buffer[1..5], &[2, 0, 0, 0]); // key 2
        assert_eq!(&buffer[5..9], &[1, 0, 0, 0]); // value 1
        assert_eq!(&buffer[9..13], &[4, 0, 0, 0]); // key 4
        assert_eq!(&buffer[13..17], &[0xFF, 0xFF, 0xFF, 0xFF]); // value -1
    }

    #[test]
    fn test_decode_preserves_order_and_unknown_keys() {
        let dict = Dictionary::from_pairs(&[(99, 5), (7, 0), (2, 1)]).unwrap();
        let mut buffer = [0u8; MAX_ENCODED_SIZE];
        let len = dict.encode(&mut buffer).unwrap();

        let decoded = Dictionary::decode(&buffer[..len]).unwrap();
        let keys: Vec<u32, MAX_TUPLES> = decoded.iter().map(|t| t.key).collect();
        assert_eq!(keys.as_slice(), &[99, 7, 2]);
        assert_eq!(decoded.first().unwrap().message_key(), None);
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(Dictionary::decode(&[]), Err(DictionaryError::Truncated));
        assert_eq!(
            Dictionary::decode(&[1, 2, 0, 0, 0, 1]),
            Err(DictionaryError::Truncated)
        );
    }

    #[test]
    fn test_decode_trailing_bytes() {
        assert_eq!(
            Dictionary::decode(&[0, 0xAB]),
            Err(DictionaryError::TrailingBytes)
        );
    }

    #[test]
    fn test_decode_too_many_tuples() {
        let mut bytes = [0u8; 1 + 17 * TUPLE_SIZE];
        bytes[0] = 17;
        assert_eq!(
            Dictionary::decode(&bytes),
            Err(DictionaryError::TooManyTuples)
        );
    }

    #[test]
    fn test_push_overflow() {
        let mut dict = Dictionary::new();
        for i in 0..MAX_TUPLES as u32 {
            dict.push_raw(i, 0).unwrap();
        }
        assert_eq!(dict.push_raw(100, 0), Err(DictionaryError::TooManyTuples));
    }

    #[test]
    fn test_get_known_key() {
        let mut dict = Dictionary::new();
        dict.push(MessageKey::HourVibrateStart, 22).unwrap();
        assert_eq!(dict.get(MessageKey::HourVibrateStart), Some(22));
        assert_eq!(dict.get(MessageKey::HourVibrateEnd), None);
    }

    proptest::proptest! {
        #[test]
        fn test_decode_arbitrary_bytes_never_panics(
            bytes in proptest::collection::vec(proptest::num::u8::ANY, 0..160)
        ) {
            if let Ok(dict) = Dictionary::decode(&bytes) {
                proptest::prop_assert_eq!(dict.encoded_len(), bytes.len());
            }
        }
    }
}
