//! Foundation types for deltakv.
//!
//! Every other deltakv crate depends on `deltakv-types` for the [`Digest`]
//! type: a fixed-width hash value that combines by XOR. Because XOR is
//! commutative, associative and self-inverse, a digest of a whole key-value
//! mapping can be maintained incrementally: adding a pair XORs its hash in,
//! removing it XORs the same hash out again.

pub mod digest;
pub mod error;

pub use digest::{Digest, DIGEST_LEN};
pub use error::TypeError;
