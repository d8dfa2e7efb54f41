//! Selection state machine.
//!
//! ```text
//! None ──tap system──▶ System ──tap body──▶ SubBody
//!  │  ◀──────back────── │     ◀────back────── │
//!  └──tap body──▶ Body ─┘ (back)
//! ```
//!
//! Entering a level fades the current content out; once that fade reports
//! back, the selected node is moved under a fresh center attached to the
//! camera and faded in. Leaving a level fades its center out, then puts the
//! node back where it came from and fades the previous content in.
//!
//! State (level, selection, distance) changes as soon as input arrives; the
//! scene follows when fades complete. Every fade carries the generation it
//! was started in. Any pick or back-out bumps the generation, so a
//! completion from an abandoned transition can tell it is stale: stale
//! entries are dropped, stale exits still restore the tree but skip the
//! fade-in.

use std::collections::HashMap;

use glam::Vec3;
use serde::Serialize;

use crate::api::types::{FadeDirection, FadeTicket, NodeId, SessionEvent};
use crate::catalog::{BodyKind, Catalog, Celestial};
use crate::components::geometry::OmniLight;
use crate::components::node::SceneNode;
use crate::config::SessionConfig;
use crate::core::scene::SceneGraph;
use crate::extensions::transform::Transform;
use crate::renderer::traits::{Fade, Hit, RenderBackend};
use crate::systems::build::{label_name, orbit_name, satellites_name, system_name, BuiltSystem};
use crate::systems::framing::{frame_node, rezoom_offset, Framing};

pub const SELECTION_CENTER: &str = "selection center";
pub const SUB_BODY_CENTER: &str = "sub-body center";
pub const FILL_LIGHT: &str = "fillLight";

const FILL_LIGHT_POSITION: Vec3 = Vec3::new(-2.0, 0.0, 1.0);
const FILL_LIGHT_INTENSITY: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLevel {
    /// Whole system in view.
    #[default]
    None,
    /// A planet with its satellites.
    System,
    /// The star or a satellite-less planet.
    Body,
    /// A planet or moon picked inside a system.
    SubBody,
}

/// Everything the state machine may touch during one call.
pub struct SceneContext<'a> {
    pub graph: &'a mut SceneGraph,
    pub backend: &'a mut dyn RenderBackend,
    pub system: &'a BuiltSystem,
    pub config: &'a SessionConfig,
    pub events: &'a mut Vec<SessionEvent>,
}

/// Where a hosted node lived before it was moved under a center.
#[derive(Debug, Clone, Copy)]
struct Origin {
    parent: NodeId,
    index: usize,
    transform: Transform,
}

/// One level of the selection stack.
#[derive(Debug, Clone)]
struct Frame {
    level: ZoomLevel,
    body: Celestial,
    node: NodeId,
    framing: Framing,
    /// Set once the entry fade-out has completed.
    center: Option<NodeId>,
    origin: Option<Origin>,
    revealed_labels: Vec<NodeId>,
    /// Label hidden on entry, with its previous hidden flag.
    hidden_label: Option<(NodeId, bool)>,
    satellite_orbits: Vec<NodeId>,
    /// Animations paused while this level was active.
    paused: Vec<NodeId>,
}

impl Frame {
    fn new(level: ZoomLevel, body: Celestial, node: NodeId, framing: Framing) -> Self {
        Self {
            level,
            body,
            node,
            framing,
            center: None,
            origin: None,
            revealed_labels: Vec::new(),
            hidden_label: None,
            satellite_orbits: Vec::new(),
            paused: Vec::new(),
        }
    }
}

/// What to fade back in once a level is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reveal {
    SolarSystem,
    Center(NodeId),
}

#[derive(Debug)]
enum Continuation {
    /// Host the frame at `depth` now that the previous content is invisible.
    Enter { depth: usize },
    /// A new center finished fading in.
    Settle { body: Celestial, level: ZoomLevel },
    /// Restore a popped frame now that its center is invisible.
    Exit { frame: Frame, reveal: Option<Reveal> },
    Revealed,
}

#[derive(Debug)]
struct Pending {
    generation: u64,
    continuation: Continuation,
}

#[derive(Debug)]
pub struct SelectionState {
    frames: Vec<Frame>,
    pending: HashMap<FadeTicket, Pending>,
    generation: u64,
    next_ticket: u32,
    zoomed: bool,
    selected_distance: Option<f32>,
    system_rotating: bool,
    body_system_rotating: bool,
    body_rotating: bool,
    showing_planet_labels: bool,
    showing_satellite_labels: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            pending: HashMap::new(),
            generation: 0,
            next_ticket: 0,
            zoomed: false,
            selected_distance: None,
            system_rotating: true,
            body_system_rotating: false,
            body_rotating: false,
            showing_planet_labels: true,
            showing_satellite_labels: false,
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every selection and pending transition. Tickets already
    /// handed to a backend become unknown and are ignored when reported.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        let next_ticket = self.next_ticket;
        *self = Self { generation, next_ticket, ..Self::default() };
    }

    // -- Queries --

    pub fn level(&self) -> ZoomLevel {
        self.frames.last().map(|f| f.level).unwrap_or(ZoomLevel::None)
    }

    /// The level-one pick: a planet system node, or a satellite-less body.
    /// This is the selected body node of the zoom flow; for Earth it is the
    /// node named "earth system".
    pub fn selected_system(&self) -> Option<NodeId> {
        self.frames.first().map(|f| f.node)
    }

    /// The level-one pick when it has no satellites: the level-one planet
    /// of the zoom flow. `None` once a planet system is selected.
    pub fn selected_body(&self) -> Option<NodeId> {
        self.frames.first().filter(|f| f.level == ZoomLevel::Body).map(|f| f.node)
    }

    pub fn selected_sub_body(&self) -> Option<NodeId> {
        self.frames.get(1).map(|f| f.node)
    }

    /// The selection center hosting the deepest selection, once entered.
    pub fn active_center(&self) -> Option<NodeId> {
        self.frames.last().and_then(|f| f.center)
    }

    pub fn selected_distance(&self) -> Option<f32> {
        self.selected_distance
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    pub fn system_rotating(&self) -> bool {
        self.system_rotating
    }

    pub fn body_system_rotating(&self) -> bool {
        self.body_system_rotating
    }

    pub fn body_rotating(&self) -> bool {
        self.body_rotating
    }

    pub fn showing_planet_labels(&self) -> bool {
        self.showing_planet_labels
    }

    pub fn showing_satellite_labels(&self) -> bool {
        self.showing_satellite_labels
    }

    /// Whether a transition started by the latest input is still running.
    pub fn is_transitioning(&self) -> bool {
        self.pending.values().any(|p| p.generation == self.generation)
    }

    // -- Input --

    /// Handle a tap. `hit` is only evaluated when a pick is possible.
    pub fn tap(&mut self, ctx: &mut SceneContext, hit: impl FnOnce() -> Option<Hit>) {
        if self.is_transitioning() {
            log::debug!("tap ignored during transition");
            return;
        }
        match self.level() {
            ZoomLevel::None => match hit() {
                Some(hit) => self.pick_level_one(ctx, &hit.name),
                None => log::debug!("tap hit nothing"),
            },
            ZoomLevel::System => match hit() {
                Some(hit) => self.pick_level_two(ctx, &hit.name),
                None => log::debug!("tap hit nothing"),
            },
            ZoomLevel::Body | ZoomLevel::SubBody => self.rezoom(ctx),
        }
    }

    fn pick_level_one(&mut self, ctx: &mut SceneContext, name: &str) {
        let Some(celestial) = Celestial::from_name(name) else {
            log::debug!("ignoring tap on {}", name);
            return;
        };
        if !Catalog::selectable_at_level_one(celestial, ctx.config.feature_unlocked) {
            log::debug!("{} is not selectable", name);
            return;
        }
        let Some(hit_node) = ctx.graph.find_in_subtree(ctx.system.solar_system, name) else {
            log::warn!("no node named {} in the solar system", name);
            return;
        };

        let has_system = celestial.kind() == BodyKind::Planet && !celestial.satellites().is_empty();
        let (level, node) = if has_system {
            let wanted = system_name(name);
            match ctx.graph.parent(hit_node).filter(|p| ctx.graph.name(*p) == Some(wanted.as_str())) {
                Some(system) => (ZoomLevel::System, system),
                None => {
                    log::warn!("{} is not inside {}", name, wanted);
                    return;
                }
            }
        } else {
            (ZoomLevel::Body, hit_node)
        };

        let framing = match frame_node(ctx.graph, node) {
            Ok(framing) => framing,
            Err(e) => {
                log::warn!("cannot frame {}: {}", name, e);
                return;
            }
        };

        let mut frame = Frame::new(level, celestial, node, framing);
        if level == ZoomLevel::System {
            if let Some(satellites) = ctx.graph.find_child(node, &satellites_name(name)) {
                for moon in celestial.satellites() {
                    let Some(anchor) = ctx.graph.find_child(satellites, &orbit_name(moon.name())) else {
                        continue;
                    };
                    frame.satellite_orbits.push(anchor);
                    if let Some(label) = ctx.graph.find_in_subtree(anchor, &label_name(moon.name())) {
                        set_hidden(ctx, label, false);
                        frame.revealed_labels.push(label);
                    }
                }
            }
            if let Some(label) = ctx.graph.find_child(node, &label_name(name)) {
                let was_hidden = ctx.graph.get(label).map(|n| n.hidden).unwrap_or(false);
                set_hidden(ctx, label, true);
                frame.hidden_label = Some((label, was_hidden));
            }
            self.body_system_rotating = true;
            self.showing_satellite_labels = true;
        } else {
            self.body_rotating = is_animating(ctx.graph, node);
        }

        self.zoomed = false;
        self.selected_distance = Some(framing.distance);
        self.frames.push(frame);
        self.generation += 1;

        let sun_light = ctx.system.sun_light;
        set_light_enabled(ctx, sun_light, false);

        let depth = self.frames.len() - 1;
        let solar_system = ctx.system.solar_system;
        self.fade(ctx, solar_system, FadeDirection::Out, Continuation::Enter { depth });
        log::info!("selecting {} at {:?}", name, level);
    }

    fn pick_level_two(&mut self, ctx: &mut SceneContext, name: &str) {
        let Some((system_node, system_center)) = self.frames.last().map(|f| (f.node, f.center)) else {
            return;
        };
        let Some(system_center) = system_center else {
            log::debug!("system not hosted yet");
            return;
        };
        let Some(celestial) = Celestial::from_name(name) else {
            log::debug!("ignoring tap on {}", name);
            return;
        };
        if celestial.kind() == BodyKind::Star {
            return;
        }
        let Some(node) = ctx.graph.find_in_subtree(system_node, name) else {
            log::debug!("{} is outside the selected system", name);
            return;
        };
        let framing = match frame_node(ctx.graph, node) {
            Ok(framing) => framing,
            Err(e) => {
                log::warn!("cannot frame {}: {}", name, e);
                return;
            }
        };

        self.body_rotating = is_animating(ctx.graph, node);
        self.zoomed = false;
        self.selected_distance = Some(framing.distance);
        self.frames.push(Frame::new(ZoomLevel::SubBody, celestial, node, framing));
        self.generation += 1;

        let depth = self.frames.len() - 1;
        self.fade(ctx, system_center, FadeDirection::Out, Continuation::Enter { depth });
        log::info!("selecting {} inside system", name);
    }

    fn rezoom(&mut self, ctx: &mut SceneContext) {
        let Some(frame) = self.frames.last() else {
            return;
        };
        if frame.center.is_none() {
            return;
        }
        let offset = rezoom_offset(frame.body.zoom_profile(), frame.framing.distance, self.zoomed);
        let node = frame.node;
        if let Some(n) = ctx.graph.get_mut(node) {
            n.transform.translation += offset;
        }
        ctx.backend.move_node(node, offset, ctx.config.move_duration);
        self.zoomed = !self.zoomed;
    }

    /// Leave the current level.
    pub fn back(&mut self, ctx: &mut SceneContext) {
        let Some(frame) = self.frames.pop() else {
            log::debug!("back pressed with nothing selected");
            return;
        };
        self.generation += 1;
        self.zoomed = false;

        if frame.level == ZoomLevel::SubBody {
            self.body_rotating = false;
            self.selected_distance = self.frames.last().map(|f| f.framing.distance);
        } else {
            self.selected_distance = None;
            self.body_system_rotating = false;
            self.body_rotating = false;
            self.showing_satellite_labels = false;
            let sun_light = ctx.system.sun_light;
            set_light_enabled(ctx, sun_light, true);
        }

        let reveal = match self.frames.last() {
            Some(top) => top.center.map(Reveal::Center),
            None => Some(Reveal::SolarSystem),
        };

        match frame.center {
            Some(center) => {
                self.fade(ctx, center, FadeDirection::Out, Continuation::Exit { frame, reveal });
            }
            None => {
                // Never hosted: nothing to fade out.
                teardown(ctx, &frame);
                if let Some(reveal) = reveal {
                    self.reveal(ctx, reveal);
                }
            }
        }

        let level = self.level();
        ctx.events.push(SessionEvent::Returned { level });
        log::info!("back to {:?}", level);
    }

    /// Pause or resume whatever moves at the current level.
    pub fn toggle_playback(&mut self, ctx: &mut SceneContext) {
        let level = self.level();
        let playing = match level {
            ZoomLevel::None => {
                self.system_rotating = !self.system_rotating;
                let system = ctx.system;
                for &anchor in system.orbits.values() {
                    if self.system_rotating {
                        resume(ctx, anchor);
                    } else {
                        pause(ctx, anchor);
                    }
                }
                self.system_rotating
            }
            ZoomLevel::System => {
                self.body_system_rotating = !self.body_system_rotating;
                let playing = self.body_system_rotating;
                if let Some(frame) = self.frames.last_mut() {
                    let orbits = frame.satellite_orbits.clone();
                    toggle_nodes(ctx, frame, &orbits, playing);
                }
                playing
            }
            ZoomLevel::Body | ZoomLevel::SubBody => {
                self.body_rotating = !self.body_rotating;
                let playing = self.body_rotating;
                if let Some(frame) = self.frames.last_mut() {
                    let node = frame.node;
                    toggle_nodes(ctx, frame, &[node], playing);
                }
                playing
            }
        };
        ctx.events.push(SessionEvent::PlaybackChanged { level, playing });
    }

    /// Show or hide the labels relevant to the current level.
    pub fn toggle_labels(&mut self, ctx: &mut SceneContext) {
        let visible = match self.level() {
            ZoomLevel::None => {
                self.showing_planet_labels = !self.showing_planet_labels;
                let system = ctx.system;
                for &label in &system.planet_labels {
                    set_hidden(ctx, label, !self.showing_planet_labels);
                }
                self.showing_planet_labels
            }
            ZoomLevel::System => {
                self.showing_satellite_labels = !self.showing_satellite_labels;
                if let Some(frame) = self.frames.last() {
                    for &label in &frame.revealed_labels {
                        set_hidden(ctx, label, !self.showing_satellite_labels);
                    }
                }
                self.showing_satellite_labels
            }
            ZoomLevel::Body | ZoomLevel::SubBody => {
                log::debug!("no labels to toggle at {:?}", self.level());
                return;
            }
        };
        ctx.events.push(SessionEvent::LabelsChanged { visible });
    }

    // -- Fade continuations --

    fn fade(&mut self, ctx: &mut SceneContext, node: NodeId, direction: FadeDirection, continuation: Continuation) {
        let ticket = FadeTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.pending.insert(ticket, Pending { generation: self.generation, continuation });
        if let Some(n) = ctx.graph.get_mut(node) {
            n.opacity = direction.target_opacity();
        }
        let fade = Fade { direction, duration: ctx.config.fade_duration };
        ctx.backend.run_fade(node, fade, ticket);
    }

    /// Resume the transition waiting on `ticket`.
    pub fn fade_completed(&mut self, ctx: &mut SceneContext, ticket: FadeTicket) {
        let Some(pending) = self.pending.remove(&ticket) else {
            log::debug!("unknown fade ticket {:?}", ticket);
            return;
        };
        let current = pending.generation == self.generation;
        match pending.continuation {
            Continuation::Enter { depth } => {
                if current {
                    self.enter(ctx, depth);
                } else {
                    log::debug!("dropping stale entry at depth {}", depth);
                }
            }
            Continuation::Settle { body, level } => {
                if current {
                    ctx.events.push(SessionEvent::Focused { body, level });
                    log::info!("focused {} at {:?}", body.name(), level);
                }
            }
            Continuation::Exit { frame, reveal } => {
                teardown(ctx, &frame);
                if current {
                    if let Some(reveal) = reveal {
                        self.reveal(ctx, reveal);
                    }
                }
            }
            Continuation::Revealed => {}
        }
    }

    fn enter(&mut self, ctx: &mut SceneContext, depth: usize) {
        let Some(frame) = self.frames.get(depth) else {
            return;
        };
        if frame.center.is_some() {
            return;
        }
        let (level, body, node, target) = (frame.level, frame.body, frame.node, frame.framing.target());

        let center_name = if level == ZoomLevel::SubBody { SUB_BODY_CENTER } else { SELECTION_CENTER };
        let Some(center) = ctx.graph.add_child(
            NodeId::CAMERA,
            SceneNode::new(NodeId(0)).with_name(center_name).with_opacity(0.0),
        ) else {
            log::warn!("camera node missing");
            return;
        };

        let Some(transform) = ctx.graph.get(node).map(|n| n.transform) else {
            log::warn!("selected node {:?} vanished", node);
            ctx.graph.remove_subtree(center);
            return;
        };
        let Some((parent, index)) = ctx.graph.detach(node) else {
            log::warn!("selected node {:?} is not attached", node);
            ctx.graph.remove_subtree(center);
            return;
        };
        ctx.backend.detach_node(node);

        if let Some(n) = ctx.graph.get_mut(node) {
            n.transform.translation = target;
        }
        ctx.graph.attach(node, center);

        if level != ZoomLevel::SubBody {
            let fill = SceneNode::new(NodeId(0))
                .with_name(FILL_LIGHT)
                .with_translation(FILL_LIGHT_POSITION)
                .with_light(OmniLight::new(FILL_LIGHT_INTENSITY));
            ctx.graph.add_child(center, fill);
        }
        ctx.backend.attach_node(ctx.graph, center);

        if let Some(frame) = self.frames.get_mut(depth) {
            frame.center = Some(center);
            frame.origin = Some(Origin { parent, index, transform });
        }
        self.fade(ctx, center, FadeDirection::In, Continuation::Settle { body, level });
    }

    fn reveal(&mut self, ctx: &mut SceneContext, reveal: Reveal) {
        match reveal {
            Reveal::SolarSystem => {
                if !self.system_rotating {
                    let system = ctx.system;
                    for &anchor in system.orbits.values() {
                        pause(ctx, anchor);
                    }
                }
                let solar_system = ctx.system.solar_system;
                self.fade(ctx, solar_system, FadeDirection::In, Continuation::Revealed);
            }
            Reveal::Center(center) => {
                if ctx.graph.contains(center) {
                    self.fade(ctx, center, FadeDirection::In, Continuation::Revealed);
                }
            }
        }
    }
}

/// Put a popped frame's node back and drop its center. Safe to repeat.
fn teardown(ctx: &mut SceneContext, frame: &Frame) {
    if let Some(origin) = frame.origin {
        if ctx.graph.contains(frame.node) && ctx.graph.parent(frame.node) != Some(origin.parent) {
            ctx.backend.detach_node(frame.node);
            if let Some(n) = ctx.graph.get_mut(frame.node) {
                n.transform = origin.transform;
            }
            if ctx.graph.insert_child(frame.node, origin.parent, origin.index) {
                ctx.backend.attach_node(ctx.graph, frame.node);
            }
        }
    }

    if let Some(center) = frame.center {
        if ctx.graph.contains(center) {
            ctx.backend.detach_node(center);
            ctx.graph.remove_subtree(center);
        }
    }

    for &label in &frame.revealed_labels {
        set_hidden(ctx, label, true);
    }
    if let Some((label, was_hidden)) = frame.hidden_label {
        set_hidden(ctx, label, was_hidden);
    }
    for &node in &frame.paused {
        resume(ctx, node);
    }
}

fn toggle_nodes(ctx: &mut SceneContext, frame: &mut Frame, nodes: &[NodeId], playing: bool) {
    for &node in nodes {
        if playing {
            resume(ctx, node);
            frame.paused.retain(|&p| p != node);
        } else if pause(ctx, node) {
            frame.paused.push(node);
        }
    }
}

fn is_animating(graph: &SceneGraph, node: NodeId) -> bool {
    graph.get(node).map(|n| n.animating).unwrap_or(false)
}

/// Stop `node`'s declared animation. Returns whether it was running.
fn pause(ctx: &mut SceneContext, node: NodeId) -> bool {
    let Some(n) = ctx.graph.get_mut(node) else {
        return false;
    };
    if !n.animating || n.animation.is_none() {
        return false;
    }
    n.animating = false;
    ctx.backend.clear_animations(node);
    true
}

/// Restart `node`'s declared animation with its own period.
fn resume(ctx: &mut SceneContext, node: NodeId) {
    let Some(n) = ctx.graph.get_mut(node) else {
        return;
    };
    let Some(animation) = n.animation else {
        return;
    };
    if n.animating {
        return;
    }
    n.animating = true;
    ctx.backend.set_animation(node, &animation);
}

fn set_hidden(ctx: &mut SceneContext, node: NodeId, hidden: bool) {
    if let Some(n) = ctx.graph.get_mut(node) {
        n.hidden = hidden;
        ctx.backend.set_hidden(node, hidden);
    }
}

fn set_light_enabled(ctx: &mut SceneContext, node: NodeId, enabled: bool) {
    if let Some(light) = ctx.graph.get_mut(node).and_then(|n| n.light_mut()) {
        light.enabled = enabled;
        ctx.backend.set_light_enabled(node, enabled);
    }
}
