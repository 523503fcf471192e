//! Hashing primitives for deltakv.
//!
//! Provides the BLAKE3-backed [`KvHasher`] that turns key-value pairs into
//! XOR-combinable [`Digest`](deltakv_types::Digest)s. All hashing wraps an
//! established library; no custom cryptography.

pub mod hasher;

pub use hasher::KvHasher;
