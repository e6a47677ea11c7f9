//! Authentication primitives.
//!
//! - [`session`] -- opaque session tokens, stored hashed, with a TTL and a
//!   watch channel per session for the standing page guard.

pub mod session;
