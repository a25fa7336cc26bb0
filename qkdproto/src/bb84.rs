//! Simulated BB84 key agreement between a sender and a receiver.
//!
//! Models the protocol classically: random bits and bases on the sender
//! side, random measurement bases on the receiver side, and an optional
//! eavesdropper who disturbs mismeasured qubits. Positions where both
//! parties chose the same basis survive sifting and form the shared key.
//! The randomness source is `rand`'s thread RNG, not a hardened CSPRNG;
//! this is a demonstration protocol and must not protect real secrets.
//!
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Transcript of one simulated BB84 exchange.
///
/// Serialized as-is to the chat frontend, which renders the bit and basis
/// strings to visualize the sifting step. Bitstrings use ASCII '0'/'1'.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyExchange {
    /// Random bits the sender encoded.
    pub sender_bits: String,
    /// Basis chosen per position by the sender (0 = rectilinear, 1 = diagonal).
    pub sender_bases: String,
    /// Basis chosen per position by the receiver.
    pub receiver_bases: String,
    /// Indices where both bases agreed, ascending.
    pub kept_positions: Vec<usize>,
    /// Measured bits at the kept positions; the key material for the demo cipher.
    pub shared_key: String,
    /// Bases used by the simulated eavesdropper, when one was present.
    pub eve_bases: Option<String>,
}

/// Draw `n` independent uniform bits.
pub(crate) fn random_bits<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<u8> {
    (0..n).map(|_| u8::from(rng.random_bool(0.5))).collect()
}

/// Render bit values as an ASCII '0'/'1' string.
pub(crate) fn bits_to_string(bits: &[u8]) -> String {
    bits.iter().map(|b| if *b == 1 { '1' } else { '0' }).collect()
}

/// Run a simulated exchange over `num_bits` qubits using the thread RNG.
pub fn generate_key(num_bits: usize, with_eve: bool) -> KeyExchange {
    generate_key_with_rng(&mut rand::rng(), num_bits, with_eve)
}

/// Run a simulated exchange with a caller-supplied RNG.
///
/// Passing a seeded RNG makes the whole transcript reproducible, which the
/// tests rely on.
pub fn generate_key_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    num_bits: usize,
    with_eve: bool,
) -> KeyExchange {
    let sender_bits = random_bits(rng, num_bits);
    let sender_bases = random_bits(rng, num_bits);
    let receiver_bases = random_bits(rng, num_bits);

    // Measurement model: a matching basis reproduces the sender's bit, a
    // mismatched basis collapses to a fresh random outcome.
    let mut measured: Vec<u8> = (0..num_bits)
        .map(|i| {
            if sender_bases[i] == receiver_bases[i] {
                sender_bits[i]
            } else {
                u8::from(rng.random_bool(0.5))
            }
        })
        .collect();

    let eve_bases = if with_eve {
        let eve = random_bits(rng, num_bits);
        for i in 0..num_bits {
            // Eve measuring in the wrong basis may flip what the receiver sees.
            if eve[i] != sender_bases[i] && rng.random_bool(0.5) {
                measured[i] = 1 - measured[i];
            }
        }
        Some(eve)
    } else {
        None
    };

    let kept_positions: Vec<usize> = (0..num_bits)
        .filter(|&i| sender_bases[i] == receiver_bases[i])
        .collect();
    let shared_key: Vec<u8> = kept_positions.iter().map(|&i| measured[i]).collect();

    KeyExchange {
        sender_bits: bits_to_string(&sender_bits),
        sender_bases: bits_to_string(&sender_bases),
        receiver_bases: bits_to_string(&receiver_bases),
        kept_positions,
        shared_key: bits_to_string(&shared_key),
        eve_bases: eve_bases.as_deref().map(bits_to_string),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn sifted_key_matches_sender_bits() {
        let mut rng = StdRng::seed_from_u64(42);
        let exchange = generate_key_with_rng(&mut rng, 64, false);

        assert_eq!(exchange.sender_bits.len(), 64);
        assert_eq!(exchange.sender_bases.len(), 64);
        assert_eq!(exchange.receiver_bases.len(), 64);
        assert_eq!(exchange.kept_positions.len(), exchange.shared_key.len());
        assert!(exchange.eve_bases.is_none());

        // Without an eavesdropper, every kept position measures the sender's bit.
        let sender = exchange.sender_bits.as_bytes();
        for (kept, key_bit) in exchange.kept_positions.iter().zip(exchange.shared_key.bytes()) {
            assert_eq!(sender[*kept], key_bit);
        }
    }

    #[test]
    fn eavesdropper_bases_are_reported() {
        let mut rng = StdRng::seed_from_u64(7);
        let exchange = generate_key_with_rng(&mut rng, 128, true);

        let eve = exchange.eve_bases.as_ref().map(String::len);
        assert_eq!(eve, Some(128));
        assert_eq!(exchange.kept_positions.len(), exchange.shared_key.len());
    }

    #[test]
    fn seeded_exchanges_are_reproducible() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(
            generate_key_with_rng(&mut a, 32, true),
            generate_key_with_rng(&mut b, 32, true)
        );
    }

    #[test]
    fn zero_qubits_yield_empty_transcript() {
        let exchange = generate_key(0, false);
        assert!(exchange.sender_bits.is_empty());
        assert!(exchange.kept_positions.is_empty());
        assert!(exchange.shared_key.is_empty());
    }
}
