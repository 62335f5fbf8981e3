//! Developer tooling: scene inspector and tree dumps.
//!
//! # Invariants
//! - Tools only read scene state.

mod inspector;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary};
