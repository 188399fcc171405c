//! Wire codecs.
//!
//! The datagram protocol between front-end and relay has no framing of its
//! own: one datagram carries one raw form body, decoded by `form`.

pub mod form;

pub use form::{decode, DecodeError, DecodedFields};
