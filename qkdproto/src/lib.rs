//! QkdChat protocol utilities crate.
//!
//! This crate contains the simulated quantum-key-distribution core used by
//! the QkdChat demo: a classical BB84 key-agreement simulation (`bb84`), a
//! keystream-expanding XOR cipher (`xor`), the encode/decode boundary
//! operations consumed by the chat frontend and HTTP backend (`codec`), and
//! the error taxonomy (`error`). Everything here is pure, synchronous
//! computation over its inputs. None of it is real cryptography; it exists
//! to visualize the protocol, not to protect data.
//!
/// BB84 key-agreement simulation module
pub mod bb84;
/// XOR keystream cipher module
pub mod xor;
/// Encode/decode boundary operations
pub mod codec;
/// Codec error taxonomy
pub mod error;
