//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers cannot mutate the scene.
//! - Render state derives from the scene graph and the view.
//! - Transparent draws follow every opaque draw.
//!
//! The [`Renderer`] trait is implemented by the text renderer here and by the
//! wgpu backend; the frame loop only sees the trait.

mod draw;
mod renderer;
mod view;

pub use draw::{DrawItem, draw_list};
pub use renderer::{DebugTextRenderer, Renderer};
pub use view::{DirectionalLight, Fog, HemisphereLight, Lighting, RenderView, ShadowCamera};
