// extensions/transform.rs
//
// 3-D local transforms and the placement helpers the scene builder uses.
// Pure math: nothing here touches the scene graph.
//
// Usage:
//   let system = place_on_orbit(&Transform::IDENTITY, body.orbit_start_angle, body.orbit_distance);
//   let tilted = tilt_axis(&system, body.axial_tilt);

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::components::geometry::Shape;

/// Translation, orientation and scale relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self { translation, rotation, scale }
    }

    /// `self` followed by `child`, i.e. the child's transform expressed in
    /// this transform's parent space.
    pub fn compose(&self, child: &Transform) -> Transform {
        Self::from_matrix(self.to_matrix() * child.to_matrix())
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.to_matrix().transform_point3(point)
    }
}

/// Transform of a body sitting on a circular orbit around `parent`.
///
/// The angle is in degrees, measured clockwise when viewed from +Y.
pub fn place_on_orbit(parent: &Transform, angle_deg: f32, distance: f32) -> Transform {
    let a = -angle_deg.to_radians();
    let offset = Transform::from_translation(Vec3::new(distance * a.cos(), 0.0, distance * a.sin()));
    parent.compose(&offset)
}

/// Tilt a transform about its local Z axis by `angle_deg` degrees.
pub fn tilt_axis(transform: &Transform, angle_deg: f32) -> Transform {
    let tilt = Quat::from_axis_angle(Vec3::Z, angle_deg.to_radians());
    Transform {
        rotation: (transform.rotation * tilt).normalize(),
        ..*transform
    }
}

/// Geometry plus placement for a straight segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub shape: Shape,
    pub transform: Transform,
}

/// Build a cylinder of radius `radius` spanning `from` to `to`.
///
/// Cylinders are modelled along +Y. A zero-length segment collapses to a
/// sphere at `from`.
pub fn align_segment(from: Vec3, to: Vec3, radius: f32) -> Segment {
    let delta = to - from;
    let length = delta.length();

    if length <= f32::EPSILON {
        return Segment {
            shape: Shape::Sphere { radius, segments: 48 },
            transform: Transform::from_translation(from),
        };
    }

    // A half-turn about the bisector of +Y and the segment direction carries
    // one onto the other.
    let up = Vec3::new(0.0, length / 2.0, 0.0);
    let half = delta / 2.0;
    let rotation = match (up + half).try_normalize() {
        Some(axis) => Quat::from_xyzw(axis.x, axis.y, axis.z, 0.0),
        // Segment points straight down.
        None => Quat::from_rotation_x(std::f32::consts::PI),
    };

    Segment {
        shape: Shape::Cylinder { radius, height: length },
        transform: Transform {
            translation: from + half,
            rotation,
            scale: Vec3::ONE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn orbit_angle_zero_lies_on_x() {
        let t = place_on_orbit(&Transform::IDENTITY, 0.0, 2.0);
        assert!(close(t.translation, Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn orbit_angle_runs_toward_negative_z() {
        let t = place_on_orbit(&Transform::IDENTITY, 90.0, 2.0);
        assert!(close(t.translation, Vec3::new(0.0, 0.0, -2.0)));
    }

    #[test]
    fn orbit_composes_with_parent() {
        let parent = Transform::from_translation(Vec3::new(1.0, 0.5, 0.0));
        let t = place_on_orbit(&parent, 0.0, 2.0);
        assert!(close(t.translation, Vec3::new(3.0, 0.5, 0.0)));

        let turned = Transform::IDENTITY.with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let t = place_on_orbit(&turned, 0.0, 1.0);
        assert!(close(t.translation, Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn orbit_distance_is_preserved() {
        for angle in [0.0, 33.0, 180.0, 271.5] {
            let t = place_on_orbit(&Transform::IDENTITY, angle, 0.75);
            assert!((t.translation.length() - 0.75).abs() < 1e-5);
            assert_eq!(t.translation.y, 0.0);
        }
    }

    #[test]
    fn orbit_zero_distance_keeps_parent_translation() {
        let parent = Transform::from_translation(Vec3::new(0.2, -1.0, 4.0))
            .with_rotation(Quat::from_rotation_y(1.1));
        for angle in [0.0, 45.0, -160.0] {
            let t = place_on_orbit(&parent, angle, 0.0);
            assert!(close(t.translation, parent.translation));
        }
    }

    #[test]
    fn zero_tilt_is_identity() {
        let start = Transform::IDENTITY.with_rotation(Quat::from_euler(glam::EulerRot::XYZ, 0.3, -0.7, 1.2));
        let t = tilt_axis(&start, 0.0);
        assert!(t.rotation.abs_diff_eq(start.rotation, 1e-6));
        assert_eq!(t.translation, start.translation);
    }

    #[test]
    fn tilt_rotates_about_z() {
        let t = tilt_axis(&Transform::IDENTITY, 90.0);
        assert!(close(t.rotation * Vec3::X, Vec3::Y));
        assert!(close(t.rotation * Vec3::Z, Vec3::Z));
    }

    #[test]
    fn tilt_and_untilt_restores_orientation() {
        let start = Transform::from_translation(Vec3::new(0.3, 0.0, 1.0))
            .with_rotation(Quat::from_rotation_y(0.4));
        let back = tilt_axis(&tilt_axis(&start, 23.4), -23.4);
        assert!(back.rotation.abs_diff_eq(start.rotation, 1e-5));
        assert_eq!(back.translation, start.translation);
    }

    #[test]
    fn zero_length_segment_is_a_sphere() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let seg = align_segment(p, p, 0.01);
        assert!(matches!(seg.shape, Shape::Sphere { .. }));
        assert_eq!(seg.transform.translation, p);
    }

    #[test]
    fn segment_spans_endpoints() {
        let cases = [
            (Vec3::new(0.0, -1.2, 0.0), Vec3::new(0.0, 1.2, 0.0)),
            (Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)),
            (Vec3::new(1.0, 1.0, 1.0), Vec3::new(-2.0, 4.0, 0.5)),
            (Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0)),
        ];
        for (from, to) in cases {
            let seg = align_segment(from, to, 0.01);
            let height = match seg.shape {
                Shape::Cylinder { height, .. } => height,
                other => panic!("expected cylinder, got {:?}", other),
            };
            assert!((height - (to - from).length()).abs() < 1e-5);
            assert!(close(seg.transform.translation, (from + to) / 2.0));
            let axis = seg.transform.rotation * Vec3::Y;
            assert!(close(axis, (to - from).normalize()), "{:?} -> {:?}", from, to);
        }
    }
}
