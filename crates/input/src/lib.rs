//! Pointer input: viewport conversion, cross-thread sharing and the mapping
//! from pointer to airplane position.
//!
//! # Invariants
//! - Stored pointer coordinates are always within `[-1, 1]`.
//! - Flight targets always lie inside the configured envelope.

pub mod pointer;
pub mod remap;

pub use pointer::{PointerParseError, PointerPosition, SharedPointer};
pub use remap::{flight_target, normalize};
