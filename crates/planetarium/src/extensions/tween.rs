// extensions/tween.rs
//
// Tween system: timed opacity fades and translation moves keyed by NodeId.
// Decoupled from the scene graph; values are pushed into a TweenSink.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(node, Tween::fade(1.0, 0.0, 0.5, Easing::Linear).with_on_complete(ticket));
//   tweens.tick(dt, &mut sink);
//   for ticket in tweens.drain_completed() { ... }

use std::collections::HashMap;

use glam::Vec3;

use super::easing::{ease, ease_vec3, Easing};
use crate::api::types::{FadeTicket, NodeId};

/// What property a tween animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    Opacity { from: f32, to: f32 },
    /// Translation relative to the parent.
    Translation { from: Vec3, to: Vec3 },
}

/// Receives interpolated values.
pub trait TweenSink {
    fn set_opacity(&mut self, node: NodeId, opacity: f32);
    fn set_translation(&mut self, node: NodeId, translation: Vec3);
}

/// A single one-shot tween.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
    /// Ticket reported through `drain_completed` when done or superseded.
    pub on_complete: Option<FadeTicket>,
}

impl Tween {
    pub fn fade(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            target: TweenTarget::Opacity { from, to },
            duration,
            elapsed: 0.0,
            easing,
            on_complete: None,
        }
    }

    pub fn translate(from: Vec3, to: Vec3, duration: f32, easing: Easing) -> Self {
        Self {
            target: TweenTarget::Translation { from, to },
            duration,
            elapsed: 0.0,
            easing,
            on_complete: None,
        }
    }

    pub fn with_on_complete(mut self, ticket: FadeTicket) -> Self {
        self.on_complete = Some(ticket);
        self
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn same_channel(&self, other: &TweenTarget) -> bool {
        matches!(
            (&self.target, other),
            (TweenTarget::Opacity { .. }, TweenTarget::Opacity { .. })
                | (TweenTarget::Translation { .. }, TweenTarget::Translation { .. })
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TweenId(u32);

/// Manages all active tweens.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: HashMap<TweenId, (NodeId, Tween)>,
    next_id: u32,
    completed: Vec<FadeTicket>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for a node. A running tween on the same node and channel
    /// is superseded: it stops where it is and its ticket completes.
    pub fn add(&mut self, node: NodeId, tween: Tween) {
        let superseded: Vec<TweenId> = self
            .tweens
            .iter()
            .filter(|(_, (n, t))| *n == node && t.same_channel(&tween.target))
            .map(|(id, _)| *id)
            .collect();
        for id in superseded {
            self.finish(id);
        }

        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (node, tween));
    }

    fn finish(&mut self, id: TweenId) {
        if let Some((_, tween)) = self.tweens.remove(&id) {
            if let Some(ticket) = tween.on_complete {
                self.completed.push(ticket);
            }
        }
    }

    /// Stop every tween on `node`. Their tickets still complete.
    pub fn remove_node(&mut self, node: NodeId) {
        let ids: Vec<TweenId> = self
            .tweens
            .iter()
            .filter(|(_, (n, _))| *n == node)
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            self.finish(id);
        }
    }

    /// End point of the translation running on `node`, if any.
    pub fn translation_target(&self, node: NodeId) -> Option<Vec3> {
        self.tweens.values().find_map(|(n, t)| match t.target {
            TweenTarget::Translation { to, .. } if *n == node => Some(to),
            _ => None,
        })
    }

    /// Advance all tweens and push values into `sink`.
    /// Returns the number of tweens that completed this tick.
    pub fn tick(&mut self, dt: f32, sink: &mut impl TweenSink) -> usize {
        let mut done = Vec::new();

        for (&id, (node, tween)) in self.tweens.iter_mut() {
            tween.elapsed += dt;
            let t = tween.progress();
            match tween.target {
                TweenTarget::Opacity { from, to } => {
                    sink.set_opacity(*node, ease(from, to, t, tween.easing));
                }
                TweenTarget::Translation { from, to } => {
                    sink.set_translation(*node, ease_vec3(from, to, t, tween.easing));
                }
            }
            if tween.is_complete() {
                done.push(id);
            }
        }

        // Stable completion order for callers.
        done.sort_by_key(|id| id.0);
        let count = done.len();
        for id in done {
            self.finish(id);
        }
        count
    }

    /// Drain tickets of tweens that completed or were superseded.
    pub fn drain_completed(&mut self) -> impl Iterator<Item = FadeTicket> + '_ {
        self.completed.drain(..)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
        self.completed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Values {
        opacity: HashMap<NodeId, f32>,
        translation: HashMap<NodeId, Vec3>,
    }

    impl TweenSink for Values {
        fn set_opacity(&mut self, node: NodeId, opacity: f32) {
            self.opacity.insert(node, opacity);
        }
        fn set_translation(&mut self, node: NodeId, translation: Vec3) {
            self.translation.insert(node, translation);
        }
    }

    #[test]
    fn fade_reaches_target_and_reports_ticket() {
        let mut tweens = TweenState::new();
        let mut values = Values::default();
        let node = NodeId(5);
        tweens.add(node, Tween::fade(1.0, 0.0, 0.5, Easing::Linear).with_on_complete(FadeTicket(9)));

        assert_eq!(tweens.tick(0.25, &mut values), 0);
        assert!((values.opacity[&node] - 0.5).abs() < 1e-5);
        assert_eq!(tweens.drain_completed().count(), 0);

        assert_eq!(tweens.tick(0.25, &mut values), 1);
        assert_eq!(values.opacity[&node], 0.0);
        assert_eq!(tweens.drain_completed().collect::<Vec<_>>(), vec![FadeTicket(9)]);
        assert!(tweens.is_empty());
    }

    #[test]
    fn translation_tween_moves() {
        let mut tweens = TweenState::new();
        let mut values = Values::default();
        let node = NodeId(3);
        let to = Vec3::new(0.0, 1.0, -2.0);
        tweens.add(node, Tween::translate(Vec3::ZERO, to, 1.0, Easing::Linear));
        tweens.tick(1.0, &mut values);
        assert_eq!(values.translation[&node], to);
    }

    #[test]
    fn new_fade_supersedes_old_one() {
        let mut tweens = TweenState::new();
        let node = NodeId(2);
        tweens.add(node, Tween::fade(1.0, 0.0, 0.5, Easing::Linear).with_on_complete(FadeTicket(1)));
        tweens.add(node, Tween::fade(0.5, 1.0, 0.5, Easing::Linear).with_on_complete(FadeTicket(2)));
        assert_eq!(tweens.len(), 1);
        assert_eq!(tweens.drain_completed().collect::<Vec<_>>(), vec![FadeTicket(1)]);
    }

    #[test]
    fn fade_and_move_run_side_by_side() {
        let mut tweens = TweenState::new();
        let node = NodeId(2);
        tweens.add(node, Tween::fade(1.0, 0.0, 0.5, Easing::Linear));
        tweens.add(node, Tween::translate(Vec3::ZERO, Vec3::X, 0.5, Easing::Linear));
        assert_eq!(tweens.len(), 2);
    }

    #[test]
    fn translation_target_reports_running_move() {
        let mut tweens = TweenState::new();
        let node = NodeId(6);
        assert_eq!(tweens.translation_target(node), None);
        tweens.add(node, Tween::fade(1.0, 0.0, 0.5, Easing::Linear));
        tweens.add(node, Tween::translate(Vec3::ZERO, Vec3::Y, 0.5, Easing::Linear));
        assert_eq!(tweens.translation_target(node), Some(Vec3::Y));
        assert_eq!(tweens.translation_target(NodeId(7)), None);
    }

    #[test]
    fn removing_node_completes_its_tickets() {
        let mut tweens = TweenState::new();
        tweens.add(NodeId(1), Tween::fade(0.0, 1.0, 1.0, Easing::Linear).with_on_complete(FadeTicket(4)));
        tweens.add(NodeId(2), Tween::fade(0.0, 1.0, 1.0, Easing::Linear).with_on_complete(FadeTicket(5)));
        tweens.remove_node(NodeId(1));
        assert_eq!(tweens.drain_completed().collect::<Vec<_>>(), vec![FadeTicket(4)]);
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn zero_duration_completes_on_next_tick() {
        let mut tweens = TweenState::new();
        let mut values = Values::default();
        tweens.add(NodeId(1), Tween::fade(0.0, 1.0, 0.0, Easing::Linear).with_on_complete(FadeTicket(7)));
        assert_eq!(tweens.tick(0.0, &mut values), 1);
        assert_eq!(values.opacity[&NodeId(1)], 1.0);
    }
}
