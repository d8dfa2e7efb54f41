use glam::Vec3;
use serde::Serialize;

use crate::api::types::NodeId;
use crate::components::animation::Animation;
use crate::components::geometry::{Mesh, OmniLight, Payload};
use crate::extensions::transform::Transform;

/// Scene node: a named transform with optional geometry or light.
/// Hierarchy links are owned by the [`SceneGraph`](crate::core::scene::SceneGraph).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub id: NodeId,
    /// Unique-by-convention name used for lookup and hit results.
    pub name: String,
    /// Transform relative to the parent.
    pub transform: Transform,
    pub payload: Option<Payload>,
    /// Declared continuous animation, kept while paused.
    pub animation: Option<Animation>,
    /// Whether the declared animation is currently running.
    pub animating: bool,
    pub opacity: f32,
    pub hidden: bool,
    /// Always face the viewer, rotating about Y only.
    pub billboard: bool,
    pub bloom: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            name: String::new(),
            transform: Transform::IDENTITY,
            payload: None,
            animation: None,
            animating: false,
            opacity: 1.0,
            hidden: false,
            billboard: false,
            bloom: false,
            parent: None,
            children: Vec::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.payload = Some(Payload::Mesh(mesh));
        self
    }

    pub fn with_light(mut self, light: OmniLight) -> Self {
        self.payload = Some(Payload::Light(light));
        self
    }

    /// Declare an animation and start it.
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self.animating = true;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn billboarded(mut self) -> Self {
        self.billboard = true;
        self
    }

    pub fn with_bloom(mut self) -> Self {
        self.bloom = true;
        self
    }

    // -- Accessors --

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.payload {
            Some(Payload::Mesh(mesh)) => Some(mesh),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&OmniLight> {
        match &self.payload {
            Some(Payload::Light(light)) => Some(light),
            _ => None,
        }
    }

    pub fn light_mut(&mut self) -> Option<&mut OmniLight> {
        match &mut self.payload {
            Some(Payload::Light(light)) => Some(light),
            _ => None,
        }
    }
}
