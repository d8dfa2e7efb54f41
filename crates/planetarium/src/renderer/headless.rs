//! Backend without a display.
//!
//! Mirrors the attached nodes, runs fades and moves on a simulated clock and
//! records every call. Used by the web bridge (which replays the recorded
//! commands in JavaScript) and by tests.

use std::collections::HashMap;

use glam::Vec3;

use super::traits::{Fade, RenderBackend, RenderCommand};
use crate::api::types::{FadeTicket, NodeId};
use crate::components::animation::Animation;
use crate::core::scene::SceneGraph;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Tween, TweenSink, TweenState};

/// Displayed state of one mirrored node.
#[derive(Debug, Clone, PartialEq)]
pub struct MirroredNode {
    pub parent: NodeId,
    pub name: String,
    pub translation: Vec3,
    pub opacity: f32,
    pub hidden: bool,
    pub light_enabled: Option<bool>,
    pub animation: Option<Animation>,
    /// Accumulated animation angle in radians.
    pub angle: f32,
}

struct Mirror(HashMap<NodeId, MirroredNode>);

impl TweenSink for Mirror {
    fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        if let Some(n) = self.0.get_mut(&node) {
            n.opacity = opacity;
        }
    }

    fn set_translation(&mut self, node: NodeId, translation: Vec3) {
        if let Some(n) = self.0.get_mut(&node) {
            n.translation = translation;
        }
    }
}

pub struct HeadlessBackend {
    mirror: Mirror,
    tweens: TweenState,
    commands: Vec<RenderCommand>,
    /// Animation angles of detached nodes, picked up again on re-attach.
    detached_angles: HashMap<NodeId, f32>,
    background_intensity: f32,
    move_easing: Easing,
    fade_easing: Easing,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            mirror: Mirror(HashMap::new()),
            tweens: TweenState::new(),
            commands: Vec::new(),
            detached_angles: HashMap::new(),
            background_intensity: 0.0,
            move_easing: Easing::SineInOut,
            fade_easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, fade: Easing, movement: Easing) -> Self {
        self.fade_easing = fade;
        self.move_easing = movement;
        self
    }

    /// Advance the clock. Returns the tickets of fades that finished or were
    /// cut short since the last tick, in completion order.
    pub fn tick(&mut self, dt: f32) -> Vec<FadeTicket> {
        for node in self.mirror.0.values_mut() {
            if let Some(animation) = node.animation {
                node.angle = (node.angle + animation.angular_rate() * dt) % std::f32::consts::TAU;
            }
        }
        self.tweens.tick(dt, &mut self.mirror);
        self.tweens.drain_completed().collect()
    }

    /// Running fades and moves.
    pub fn pending_tweens(&self) -> usize {
        self.tweens.len()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn drain_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn node(&self, id: NodeId) -> Option<&MirroredNode> {
        self.mirror.0.get(&id)
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.mirror.0.contains_key(&id)
    }

    pub fn opacity(&self, id: NodeId) -> Option<f32> {
        self.node(id).map(|n| n.opacity)
    }

    pub fn is_animating(&self, id: NodeId) -> bool {
        self.node(id).map(|n| n.animation.is_some()).unwrap_or(false)
    }

    pub fn background_intensity(&self) -> f32 {
        self.background_intensity
    }

    pub fn len(&self) -> usize {
        self.mirror.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.0.is_empty()
    }

    fn mirrored_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            let current = out[i];
            out.extend(
                self.mirror
                    .0
                    .iter()
                    .filter(|(_, n)| n.parent == current)
                    .map(|(child, _)| *child),
            );
            i += 1;
        }
        out
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for HeadlessBackend {
    fn attach_node(&mut self, graph: &SceneGraph, node: NodeId) {
        let nodes = graph.snapshot(node);
        let parent = graph.parent(node).unwrap_or(NodeId::ROOT);
        for n in &nodes {
            let angle = match self.mirror.0.get(&n.id) {
                Some(existing) => existing.angle,
                None => self.detached_angles.remove(&n.id).unwrap_or(0.0),
            };
            self.mirror.0.insert(
                n.id,
                MirroredNode {
                    parent: n.parent().unwrap_or(parent),
                    name: n.name.clone(),
                    translation: n.transform.translation,
                    opacity: n.opacity,
                    hidden: n.hidden,
                    light_enabled: n.light().map(|l| l.enabled),
                    animation: n.animation.filter(|_| n.animating),
                    angle,
                },
            );
        }
        self.commands.push(RenderCommand::Attach { parent, nodes });
    }

    fn detach_node(&mut self, node: NodeId) {
        for id in self.mirrored_descendants(node) {
            self.tweens.remove_node(id);
            if let Some(n) = self.mirror.0.remove(&id) {
                self.detached_angles.insert(id, n.angle);
            }
        }
        self.commands.push(RenderCommand::Detach { node });
    }

    fn set_animation(&mut self, node: NodeId, animation: &Animation) {
        if let Some(n) = self.mirror.0.get_mut(&node) {
            n.animation = Some(*animation);
        }
        self.commands.push(RenderCommand::SetAnimation { node, animation: *animation });
    }

    fn clear_animations(&mut self, node: NodeId) {
        if let Some(n) = self.mirror.0.get_mut(&node) {
            n.animation = None;
        }
        self.commands.push(RenderCommand::ClearAnimations { node });
    }

    fn run_fade(&mut self, node: NodeId, fade: Fade, ticket: FadeTicket) {
        self.commands.push(RenderCommand::Fade { node, fade, ticket });
        match self.mirror.0.get(&node) {
            Some(n) => {
                let tween = Tween::fade(n.opacity, fade.direction.target_opacity(), fade.duration, self.fade_easing)
                    .with_on_complete(ticket);
                self.tweens.add(node, tween);
            }
            None => {
                log::warn!("fade on unattached node {:?}", node);
                // Still owed to the caller.
                let tween = Tween::fade(0.0, 0.0, 0.0, self.fade_easing).with_on_complete(ticket);
                self.tweens.add(node, tween);
            }
        }
    }

    fn move_node(&mut self, node: NodeId, by: Vec3, duration: f32) {
        self.commands.push(RenderCommand::Move { node, by, duration });
        if let Some(n) = self.mirror.0.get(&node) {
            let from = n.translation;
            // Moves stack: a move issued mid-flight extends the running one.
            let base = self.tweens.translation_target(node).unwrap_or(from);
            self.tweens.add(node, Tween::translate(from, base + by, duration, self.move_easing));
        }
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(n) = self.mirror.0.get_mut(&node) {
            n.hidden = hidden;
        }
        self.commands.push(RenderCommand::SetHidden { node, hidden });
    }

    fn set_light_enabled(&mut self, node: NodeId, enabled: bool) {
        if let Some(n) = self.mirror.0.get_mut(&node) {
            n.light_enabled = Some(enabled);
        }
        self.commands.push(RenderCommand::SetLightEnabled { node, enabled });
    }

    fn set_background_intensity(&mut self, intensity: f32) {
        self.background_intensity = intensity;
        self.commands.push(RenderCommand::BackgroundIntensity { intensity });
    }
}
