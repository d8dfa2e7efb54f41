pub mod api;
pub mod catalog;
pub mod components;
pub mod config;
pub mod core;
pub mod error;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::session::Session;
pub use api::types::{FadeDirection, FadeTicket, NodeId, SessionEvent};
pub use catalog::{Body, BodyKind, Catalog, Celestial, CelestialInfo};
pub use components::{Animation, AnimationKind, Material, Mesh, OmniLight, Payload, SceneNode, Shape};
pub use config::SessionConfig;
pub use core::scene::SceneGraph;
pub use error::{Error, Result};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::headless::HeadlessBackend;
pub use renderer::traits::{Fade, Hit, HitTester, RenderBackend, RenderCommand};
pub use systems::build::{build_system, BuiltSystem};
pub use systems::framing::{frame_node, Framing};
pub use systems::selection::{SelectionState, ZoomLevel};

// Extensions: math and timing helpers
pub use extensions::{ease, lerp, Easing, Transform, Tween, TweenState};
