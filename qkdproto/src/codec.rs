//! Encode/decode boundary operations for the chat frontend.
//!
//! `encode` runs a full local key agreement sized to the message (eight
//! simulated qubits per plaintext byte) and XOR-encrypts under the sifted
//! key; `decode` reverses it given the ciphertext hex and the key
//! bitstring. The byte-level `xor_encrypt`/`xor_decrypt` pair serves the
//! HTTP backend, where the key comes from an earlier `/generate_key` call.
//! These shapes are the interchange contract with the remote service: any
//! implementation producing the same hex and bitstring encodings is a
//! drop-in replacement.
//!
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bb84::{bits_to_string, random_bits};
use crate::error::CodecError;
use crate::xor::XorCipher;

/// Outputs of a locally simulated encode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Ciphertext as lowercase hex, two digits per plaintext byte.
    pub cipher_hex: String,
    /// Sifted shared key bitstring; may be empty.
    pub key_bits: String,
    /// Derived keystream bytes as hex, same byte length as the plaintext.
    pub key_bytes_hex: String,
    /// Echo of the plaintext for the decrypted message view.
    pub plaintext: String,
}

/// Simulate a key agreement for `plain` and encrypt it, using the thread RNG.
pub fn encode(plain: &str) -> Encoded {
    encode_with_rng(&mut rand::rng(), plain)
}

/// Deterministic variant of [`encode`] for caller-supplied RNGs.
pub fn encode_with_rng<R: Rng + ?Sized>(rng: &mut R, plain: &str) -> Encoded {
    let plain_bytes = plain.as_bytes();
    let num_bits = plain_bytes.len() * 8;

    let sender_bits = random_bits(rng, num_bits);
    let sender_bases = random_bits(rng, num_bits);
    let receiver_bases = random_bits(rng, num_bits);

    // Sifting: keep the sender's bit wherever both sides chose the same basis.
    let key: Vec<u8> = (0..num_bits)
        .filter(|&i| sender_bases[i] == receiver_bases[i])
        .map(|i| sender_bits[i])
        .collect();
    let key_bits = bits_to_string(&key);

    let mut cipher = XorCipher::from_bits(key);
    let key_bytes = cipher.keystream(plain_bytes.len());
    let mut data = plain_bytes.to_vec();
    cipher.apply(&mut data);

    Encoded {
        cipher_hex: hex::encode(&data),
        key_bits,
        key_bytes_hex: hex::encode(&key_bytes),
        plaintext: plain.to_string(),
    }
}

/// Recover the plaintext from ciphertext hex and the negotiated key.
///
/// Fails with `InvalidEncoding` on malformed hex or key bits and with
/// `DecodeFailure` when the recovered bytes are not valid UTF-8.
pub fn decode(cipher_hex: &str, key_bits: &str) -> Result<String, CodecError> {
    let bytes = xor_decrypt(&hex::decode(cipher_hex)?, key_bits)?;
    Ok(String::from_utf8(bytes)?)
}

/// Like [`decode`], but substitutes U+FFFD for invalid UTF-8 sequences
/// instead of failing. Malformed hex or key bits still error.
pub fn decode_lossy(cipher_hex: &str, key_bits: &str) -> Result<String, CodecError> {
    let bytes = xor_decrypt(&hex::decode(cipher_hex)?, key_bits)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// XOR-encrypt raw bytes under a key bitstring.
pub fn xor_encrypt(plain: &[u8], key_bits: &str) -> Result<Vec<u8>, CodecError> {
    let mut cipher = XorCipher::new(key_bits)?;
    let mut data = plain.to_vec();
    cipher.apply(&mut data);
    Ok(data)
}

/// Inverse of [`xor_encrypt`]; XOR is self-inverse so it is the same operation.
pub fn xor_decrypt(cipher: &[u8], key_bits: &str) -> Result<Vec<u8>, CodecError> {
    xor_encrypt(cipher, key_bits)
}
