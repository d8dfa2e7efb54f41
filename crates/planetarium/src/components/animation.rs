//! Continuous animations attached to scene nodes.
//!
//! An animation is a declaration, not a timeline: the render backend runs it
//! forever until cleared. Pausing clears it, resuming re-applies the same
//! declaration.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    /// Rotation of a body about its own axis.
    Spin,
    /// Rotation of an orbit anchor, carrying its children around.
    Revolution,
}

/// An endless rotation about a local axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub kind: AnimationKind,
    pub axis: Vec3,
    /// Seconds per full turn.
    pub period: f32,
    /// Clockwise when viewed from +axis.
    pub retrograde: bool,
}

impl Animation {
    pub fn spin(period: f32, retrograde: bool) -> Self {
        Self { kind: AnimationKind::Spin, axis: Vec3::Y, period, retrograde }
    }

    pub fn revolution(period: f32) -> Self {
        Self { kind: AnimationKind::Revolution, axis: Vec3::Y, period, retrograde: false }
    }

    /// Signed angular velocity in radians per second.
    pub fn angular_rate(&self) -> f32 {
        if self.period <= 0.0 {
            return 0.0;
        }
        let rate = TAU / self.period;
        if self.retrograde { -rate } else { rate }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrograde_spin_runs_backwards() {
        let pro = Animation::spin(15.0, false);
        let retro = Animation::spin(15.0, true);
        assert!(pro.angular_rate() > 0.0);
        assert_eq!(retro.angular_rate(), -pro.angular_rate());
    }

    #[test]
    fn one_period_is_one_turn() {
        let orbit = Animation::revolution(20.0);
        assert!((orbit.angular_rate() * 20.0 - TAU).abs() < 1e-5);
        assert_eq!(orbit.kind, AnimationKind::Revolution);
    }

    #[test]
    fn zero_period_does_not_move() {
        assert_eq!(Animation::revolution(0.0).angular_rate(), 0.0);
    }
}
