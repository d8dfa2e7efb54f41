//! Render backend contract.
//!
//! The core owns the scene graph and decides what should happen; a backend
//! (SceneKit/RealityKit on device, WebGL in the browser, or the headless
//! backend in tests) mirrors the graph and runs the timed effects.
//!
//! Fades are asynchronous. The backend must eventually report every ticket
//! it was given back to `Session::on_fade_complete`, including tickets of
//! fades that were superseded or whose node was detached.

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::api::types::{FadeDirection, FadeTicket, NodeId};
use crate::components::animation::Animation;
use crate::components::node::SceneNode;
use crate::core::scene::SceneGraph;
use crate::extensions::transform::Transform;

/// A node under the user's tap.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub name: String,
    pub world_transform: Transform,
}

/// Resolves a screen point to the nearest node under it.
pub trait HitTester {
    fn hit_test(&self, point: Vec2) -> Option<Hit>;
}

/// An opacity fade request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fade {
    pub direction: FadeDirection,
    /// Seconds.
    pub duration: f32,
}

/// Renderer trait for scene backends.
///
/// # Example Implementation
///
/// ```ignore
/// impl RenderBackend for SceneKitBridge {
///     fn attach_node(&mut self, graph: &SceneGraph, node: NodeId) {
///         let parent = graph.parent(node).unwrap_or(NodeId::ROOT);
///         self.native(parent).add_child(self.build(graph.snapshot(node)));
///     }
///     // ...
/// }
/// ```
pub trait RenderBackend {
    /// `node` was attached under its graph parent. Mirror it and its subtree.
    fn attach_node(&mut self, graph: &SceneGraph, node: NodeId);

    /// Remove `node` and its subtree from display.
    fn detach_node(&mut self, node: NodeId);

    /// Start (or restart) a continuous animation on `node`.
    fn set_animation(&mut self, node: NodeId, animation: &Animation);

    /// Stop every continuous animation on `node`, freezing it in place.
    fn clear_animations(&mut self, node: NodeId);

    /// Fade `node`'s opacity; report `ticket` when done.
    fn run_fade(&mut self, node: NodeId, fade: Fade, ticket: FadeTicket);

    /// Animate `node`'s local translation by `by` over `duration` seconds.
    fn move_node(&mut self, node: NodeId, by: Vec3, duration: f32);

    fn set_hidden(&mut self, node: NodeId, hidden: bool);

    fn set_light_enabled(&mut self, node: NodeId, enabled: bool);

    /// Intensity of the camera-feed backdrop behind the starfield.
    fn set_background_intensity(&mut self, intensity: f32);
}

/// Every backend call as plain data, for bridges that replay commands on
/// the host side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Subtree snapshot, depth first; the first node is the attached one.
    Attach { parent: NodeId, nodes: Vec<SceneNode> },
    Detach { node: NodeId },
    SetAnimation { node: NodeId, animation: Animation },
    ClearAnimations { node: NodeId },
    Fade { node: NodeId, fade: Fade, ticket: FadeTicket },
    Move { node: NodeId, by: Vec3, duration: f32 },
    SetHidden { node: NodeId, hidden: bool },
    SetLightEnabled { node: NodeId, enabled: bool },
    BackgroundIntensity { intensity: f32 },
}

impl RenderCommand {
    /// Node the command targets, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            RenderCommand::Attach { nodes, .. } => nodes.first().map(|n| n.id),
            RenderCommand::Detach { node }
            | RenderCommand::SetAnimation { node, .. }
            | RenderCommand::ClearAnimations { node }
            | RenderCommand::Fade { node, .. }
            | RenderCommand::Move { node, .. }
            | RenderCommand::SetHidden { node, .. }
            | RenderCommand::SetLightEnabled { node, .. } => Some(*node),
            RenderCommand::BackgroundIntensity { .. } => None,
        }
    }
}
