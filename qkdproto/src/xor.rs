//! Stream-based XOR cipher keyed by a sifted BB84 bitstring
//!
//! This module provides `XorCipher`, a small stateful XOR stream cipher
//! keyed by the bitstring that survives basis sifting. It is NOT
//! cryptographically secure and should not be relied upon for protecting
//! sensitive data in adversarial environments. An empty key degrades to an
//! all-zero keystream, i.e. no encryption at all; callers showing this path
//! to users should label it accordingly.
//!
use crate::error::CodecError;

/// Stream cipher using XOR with a bit-expanded shared key
pub struct XorCipher {
    /// Key bits surviving basis agreement, one 0/1 value per element
    bits: Vec<u8>,
    /// Current byte position in the keystream for stateful encryption
    cursor: usize,
}

impl XorCipher {
    /// Create a cipher from a negotiated key bitstring
    ///
    /// The string must contain only ASCII '0' and '1'. The empty key is
    /// accepted and selects the degenerate all-zero keystream.
    ///
    /// # Arguments
    /// * `key_bits` - Shared key bitstring from a BB84 exchange
    pub fn new(key_bits: &str) -> Result<Self, CodecError> {
        let bits = key_bits
            .bytes()
            .map(|c| match c {
                b'0' => Ok(0),
                b'1' => Ok(1),
                other => Err(CodecError::InvalidEncoding(format!(
                    "key bit must be '0' or '1', got {:?}",
                    other as char
                ))),
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Ok(Self { bits, cursor: 0 })
    }

    /// Build a cipher directly from already-validated bit values.
    pub(crate) fn from_bits(bits: Vec<u8>) -> Self {
        Self { bits, cursor: 0 }
    }

    /// Keystream byte at byte position `pos`: the eight key bits starting
    /// at bit index `pos * 8`, reused cyclically, packed most significant
    /// bit first.
    fn keystream_byte(&self, pos: usize) -> u8 {
        if self.bits.is_empty() {
            return 0;
        }
        let mut byte = 0u8;
        for bit in 0..8 {
            let idx = (pos * 8 + bit) % self.bits.len();
            byte = (byte << 1) | self.bits[idx];
        }
        byte
    }

    /// Apply XOR encryption/decryption to data
    ///
    /// Encrypts or decrypts data in-place. The cipher maintains its byte
    /// position so successive calls continue the same keystream.
    ///
    /// # Arguments
    /// * `data` - Byte slice to encrypt/decrypt in-place
    pub fn apply(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte ^= self.keystream_byte(self.cursor);
            self.cursor += 1;
        }
    }

    /// Materialize the first `len` keystream bytes without advancing the
    /// cipher position.
    pub fn keystream(&self, len: usize) -> Vec<u8> {
        (0..len).map(|pos| self.keystream_byte(pos)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystream_packs_bits_msb_first() {
        let cipher = XorCipher::new("10000000").unwrap();
        assert_eq!(cipher.keystream(3), vec![0x80, 0x80, 0x80]);

        // A single '1' repeats into every bit position.
        let ones = XorCipher::new("1").unwrap();
        assert_eq!(ones.keystream(2), vec![0xff, 0xff]);

        // "10" alternates per bit, giving 0b10101010.
        let alternating = XorCipher::new("10").unwrap();
        assert_eq!(alternating.keystream(1), vec![0xaa]);
    }

    #[test]
    fn empty_key_is_all_zero_keystream() {
        let mut cipher = XorCipher::new("").unwrap();
        assert_eq!(cipher.keystream(4), vec![0, 0, 0, 0]);

        let mut data = b"plain".to_vec();
        cipher.apply(&mut data);
        assert_eq!(data, b"plain");
    }

    #[test]
    fn split_applies_form_one_stream() {
        let mut whole = XorCipher::new("1011001").unwrap();
        let mut data = b"continuous stream".to_vec();
        whole.apply(&mut data);

        let mut split = XorCipher::new("1011001").unwrap();
        let mut first = b"continuous".to_vec();
        let mut second = b" stream".to_vec();
        split.apply(&mut first);
        split.apply(&mut second);
        first.extend_from_slice(&second);

        assert_eq!(data, first);
    }

    #[test]
    fn rejects_non_binary_key_characters() {
        let err = XorCipher::new("0121").err().unwrap();
        assert!(matches!(err, CodecError::InvalidEncoding(_)));
    }
}
