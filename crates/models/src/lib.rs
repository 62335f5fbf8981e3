//! Procedural scene models and the drivers that animate them.
//!
//! Each builder appends a subtree to a [`aviator_kernel::SceneGraph`] and
//! returns a handle holding the node ids it needs to animate later.
//!
//! # Invariants
//! - Builders draw randomness only from the caller's RNG, so a seed fixes the
//!   whole layout.
//! - The sea keeps one wave descriptor per merged vertex; the count never
//!   changes after construction.
//! - Phases (hair, waves, propeller) stay in `[0, 2π)`; sea and sky spins
//!   accumulate without wrapping.

pub mod airplane;
pub mod cloud;
pub mod drivers;
pub mod pilot;
pub mod sea;
pub mod sky;

pub use airplane::AirPlane;
pub use cloud::Cloud;
pub use drivers::{Accumulate, Axis, advance_phase, hair_scale, spin};
pub use pilot::Pilot;
pub use sea::{Sea, WaveVertex};
pub use sky::Sky;
