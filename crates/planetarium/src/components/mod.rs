pub mod animation;
pub mod geometry;
pub mod node;

pub use animation::{Animation, AnimationKind};
pub use geometry::{Color, Lighting, Material, Mesh, OmniLight, Payload, Shape};
pub use node::SceneNode;
