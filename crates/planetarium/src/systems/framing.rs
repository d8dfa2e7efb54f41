//! Zoom framing: where a selected node sits in front of the camera, and the
//! nudge applied by the re-zoom toggle.

use glam::Vec3;

use crate::api::types::NodeId;
use crate::catalog::{Celestial, ZoomProfile};
use crate::components::geometry::Shape;
use crate::core::scene::SceneGraph;
use crate::error::{Error, Result};
use crate::systems::build::{rings_name, satellites_name};

/// Distance from the camera in multiples of the bounding radius.
pub const FRAME_DISTANCE_FACTOR: f32 = 3.3;

/// Fraction of the ring plate's half-width that counts as visible ring.
const RING_FIT: f32 = 0.65;
/// Fraction of the outermost satellite orbit kept in view.
const OUTER_ORBIT_FIT: f32 = 0.95;
const SYSTEM_VERTICAL_DIVISOR: f32 = 4.0;
const SPHERE_VERTICAL_DIVISOR: f32 = 2.5;
const REZOOM_LATERAL_DIVISOR: f32 = 140.0;

/// Placement of a selected node inside its selection center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    /// Bounding radius used for the fit.
    pub radius: f32,
    /// Distance in front of the camera.
    pub distance: f32,
    /// Height above the line of sight.
    pub vertical_offset: f32,
}

impl Framing {
    fn new(radius: f32, vertical_divisor: f32) -> Self {
        Self {
            radius,
            distance: radius * FRAME_DISTANCE_FACTOR,
            vertical_offset: radius / vertical_divisor,
        }
    }

    /// Local translation of the node under a camera-attached center.
    pub fn target(&self) -> Vec3 {
        Vec3::new(0.0, self.vertical_offset, -self.distance)
    }
}

/// Frame `node` by its bounding geometry:
/// ring plate for ringed planets, outermost satellite orbit for planet
/// systems, sphere radius for everything else.
pub fn frame_node(graph: &SceneGraph, node: NodeId) -> Result<Framing> {
    let name = graph
        .name(node)
        .ok_or_else(|| Error::MissingNode(format!("{:?}", node)))?
        .to_string();

    if let Some(profile) = Celestial::from_name(&name).map(Celestial::zoom_profile) {
        if let Some(divisor) = profile.ring_vertical_divisor {
            return frame_rings(graph, node, &name, divisor);
        }
    }

    if let Some(body) = name.strip_suffix(" system") {
        return frame_system(graph, node, body);
    }

    match graph.get(node).and_then(|n| n.mesh()).map(|m| &m.shape) {
        Some(Shape::Sphere { radius, .. }) => Ok(Framing::new(*radius, SPHERE_VERTICAL_DIVISOR)),
        _ => Err(Error::MissingGeometry { node: name, expected: "sphere" }),
    }
}

fn frame_rings(graph: &SceneGraph, node: NodeId, name: &str, divisor: f32) -> Result<Framing> {
    let rings_id = rings_name(name);
    let rings = graph
        .find_child(node, &rings_id)
        .ok_or_else(|| Error::MissingNode(rings_id.clone()))?;
    match graph.get(rings).and_then(|n| n.mesh()).map(|m| &m.shape) {
        Some(Shape::Plate { width, .. }) => Ok(Framing::new(width / 2.0 * RING_FIT, divisor)),
        _ => Err(Error::MissingGeometry { node: rings_id, expected: "plate" }),
    }
}

fn frame_system(graph: &SceneGraph, node: NodeId, body: &str) -> Result<Framing> {
    let sats_id = satellites_name(body);
    let satellites = graph
        .find_child(node, &sats_id)
        .ok_or_else(|| Error::MissingNode(sats_id.clone()))?;

    // Rings are added innermost first.
    let outer = graph
        .children(satellites)
        .iter()
        .rev()
        .find_map(|id| match graph.get(*id).and_then(|n| n.mesh()).map(|m| &m.shape) {
            Some(Shape::Torus { ring_radius, .. }) => Some(*ring_radius),
            _ => None,
        })
        .ok_or(Error::MissingGeometry { node: sats_id, expected: "torus" })?;

    Ok(Framing::new(outer * OUTER_ORBIT_FIT, SYSTEM_VERTICAL_DIVISOR))
}

/// Offset for the re-zoom toggle. Moves closer when not yet zoomed, and
/// back by the same amount when zoomed.
pub fn rezoom_offset(profile: ZoomProfile, distance: f32, zoomed: bool) -> Vec3 {
    let k = if zoomed { -1.0 } else { 1.0 };
    Vec3::new(
        distance / REZOOM_LATERAL_DIVISOR * k,
        -(distance / profile.rezoom_vertical_divisor) * k,
        distance / profile.rezoom_distance_divisor * k,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::extensions::transform::Transform;
    use crate::systems::build::build_system;

    fn built() -> SceneGraph {
        let mut graph = SceneGraph::new();
        build_system(&mut graph, &Catalog::new(1.0), &Transform::IDENTITY).unwrap();
        graph
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn plain_body_frames_by_sphere() {
        let graph = built();
        let mars = graph.find_by_name("mars").unwrap();
        let r = Catalog::new(1.0).body(Celestial::Mars).radius;
        let f = frame_node(&graph, mars).unwrap();
        assert!(approx(f.distance, r * 3.3));
        assert!(approx(f.vertical_offset, r / 2.5));
        assert_eq!(f.target(), Vec3::new(0.0, f.vertical_offset, -f.distance));
    }

    #[test]
    fn saturn_frames_by_rings() {
        let graph = built();
        let saturn = graph.find_by_name("saturn").unwrap();
        let width = Catalog::new(1.0).body(Celestial::Saturn).ring_width.unwrap();
        let f = frame_node(&graph, saturn).unwrap();
        let r = width / 2.0 * 0.65;
        assert!(approx(f.radius, r));
        assert!(approx(f.vertical_offset, r / 3.0));
    }

    #[test]
    fn uranus_uses_its_own_divisor() {
        let graph = built();
        let uranus = graph.find_by_name("uranus").unwrap();
        let f = frame_node(&graph, uranus).unwrap();
        assert!(approx(f.vertical_offset, f.radius / 4.0));
    }

    #[test]
    fn system_frames_by_outer_orbit() {
        let graph = built();
        let jupiter = graph.find_by_name("jupiter system").unwrap();
        let callisto = Catalog::new(1.0).body(Celestial::Callisto).orbit_distance;
        let f = frame_node(&graph, jupiter).unwrap();
        assert!(approx(f.radius, callisto * 0.95));
        assert!(approx(f.vertical_offset, f.radius / 4.0));
    }

    #[test]
    fn node_without_geometry_is_an_error() {
        let graph = built();
        let anchor = graph.find_by_name("mars-orbit").unwrap();
        assert!(matches!(frame_node(&graph, anchor), Err(Error::MissingGeometry { .. })));
    }

    #[test]
    fn rezoom_there_and_back_cancels() {
        let profile = Celestial::Earth.zoom_profile();
        let there = rezoom_offset(profile, 0.5, false);
        let back = rezoom_offset(profile, 0.5, true);
        assert_eq!(there + back, Vec3::ZERO);
        assert!(approx(there.x, 0.5 / 140.0));
        assert!(approx(there.y, -0.5 / 7.6));
        assert!(approx(there.z, 0.5 / 2.47));
    }

    #[test]
    fn rezoom_uses_body_table() {
        let d = 1.0;
        let saturn = rezoom_offset(Celestial::Saturn.zoom_profile(), d, false);
        let uranus = rezoom_offset(Celestial::Uranus.zoom_profile(), d, false);
        assert!(approx(saturn.z, 1.0 / 1.57));
        assert!(approx(saturn.y, -1.0 / 9.4));
        assert!(approx(uranus.z, 1.0 / 2.09));
        assert!(approx(uranus.y, -1.0 / 11.7));
    }
}
