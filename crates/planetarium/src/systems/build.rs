//! Scene builder: turns the catalog into the display tree for one session.
//!
//! Layout under the model center:
//!
//! ```text
//! model center
//! ├── background
//! └── solar system
//!     ├── sunLight
//!     ├── sun-lineOrbit ×8
//!     ├── sun
//!     ├── sun-label
//!     └── <planet>-orbit                (revolves)
//!         └── <planet> system
//!             ├── <planet>-satellites   (tilted like the planet)
//!             │   ├── <planet>-lineOrbit
//!             │   └── <moon>-orbit      (revolves)
//!             │       └── <moon>
//!             │           └── <moon>-label (hidden)
//!             ├── <planet>               (spins)
//!             │   ├── <planet>-axis
//!             │   └── <planet>-rings
//!             └── <planet>-label
//! ```

use std::collections::BTreeMap;

use glam::{Quat, Vec3};

use crate::api::types::NodeId;
use crate::catalog::{Body, Catalog, Celestial};
use crate::components::animation::Animation;
use crate::components::geometry::{Color, Material, Mesh, OmniLight, Shape};
use crate::components::node::SceneNode;
use crate::core::scene::SceneGraph;
use crate::error::{Error, Result};
use crate::extensions::transform::{align_segment, place_on_orbit, tilt_axis, Transform};

pub const MODEL_CENTER: &str = "model center";
pub const SOLAR_SYSTEM: &str = "solar system";
pub const BACKGROUND: &str = "background";
pub const SUN_LIGHT: &str = "sunLight";

const SUN_LIGHT_INTENSITY: f32 = 1000.0;
/// Distance from the camera to the system's edge at build time.
const MODEL_MARGIN: f32 = 0.2;
const BACKGROUND_RADIUS_FACTOR: f32 = 5.0;
const AXIS_EXTENT: f32 = 1.2;
const AXIS_RADIUS_DIVISOR: f32 = 30_000.0;
const LABEL_NODE_SCALE: f32 = 0.0002;
const LABEL_MIN_OFFSET: f32 = 0.05;
const DETAILED_SEGMENTS: u32 = 200;
const MOON_SEGMENTS: u32 = 48;

// ── Node names ───────────────────────────────────────────────────────

pub fn system_name(body: &str) -> String {
    format!("{} system", body)
}

pub fn orbit_name(body: &str) -> String {
    format!("{}-orbit", body)
}

pub fn satellites_name(body: &str) -> String {
    format!("{}-satellites", body)
}

pub fn label_name(body: &str) -> String {
    format!("{}-label", body)
}

pub fn rings_name(body: &str) -> String {
    format!("{}-rings", body)
}

pub fn axis_name(body: &str) -> String {
    format!("{}-axis", body)
}

pub fn orbit_ring_name(parent: &str) -> String {
    format!("{}-lineOrbit", parent)
}

/// Handles to the nodes the session needs after building.
#[derive(Debug, Clone)]
pub struct BuiltSystem {
    pub model_center: NodeId,
    pub background: NodeId,
    pub solar_system: NodeId,
    pub sun_light: NodeId,
    pub sun: NodeId,
    /// Planet to its revolving orbit anchor.
    pub orbits: BTreeMap<Celestial, NodeId>,
    /// Labels of the star and planets.
    pub planet_labels: Vec<NodeId>,
}

fn named(name: impl Into<String>) -> SceneNode {
    SceneNode::new(NodeId(0)).with_name(name)
}

fn add(graph: &mut SceneGraph, parent: NodeId, node: SceneNode) -> Result<NodeId> {
    graph
        .add_child(parent, node)
        .ok_or_else(|| Error::MissingNode(format!("{:?}", parent)))
}

fn sphere(body: &Body, material: Material) -> Mesh {
    let segments = if body.is_moon() { MOON_SEGMENTS } else { DETAILED_SEGMENTS };
    Mesh::new(Shape::Sphere { radius: body.radius, segments }, material)
}

fn tilted(angle_deg: f32) -> Transform {
    if angle_deg == 0.0 {
        Transform::IDENTITY
    } else {
        tilt_axis(&Transform::IDENTITY, angle_deg)
    }
}

/// Build the whole system in front of `camera` and attach it under the root.
pub fn build_system(graph: &mut SceneGraph, catalog: &Catalog, camera: &Transform) -> Result<BuiltSystem> {
    let scale = catalog.scale();
    if !(scale.is_finite() && scale > 0.0) {
        return Err(Error::InvalidScale(scale));
    }

    let placement = camera
        .compose(&Transform::from_translation(Vec3::new(0.0, 0.0, -(scale + MODEL_MARGIN))))
        .with_rotation(Quat::IDENTITY);
    let model_center = add(graph, NodeId::ROOT, named(MODEL_CENTER).with_transform(placement))?;

    let starfield = Mesh::new(
        Shape::Sphere { radius: scale * BACKGROUND_RADIUS_FACTOR, segments: DETAILED_SEGMENTS },
        Material::textured("stars").constant().double_sided(),
    );
    let background = add(graph, model_center, named(BACKGROUND).with_mesh(starfield).hidden())?;

    let solar_system = add(graph, model_center, named(SOLAR_SYSTEM))?;
    let sun_light = add(
        graph,
        solar_system,
        named(SUN_LIGHT).with_light(OmniLight::new(SUN_LIGHT_INTENSITY)),
    )?;

    let star = catalog.body(Celestial::Sun);
    add_orbit_rings(graph, catalog, solar_system, &star)?;
    let sun = add(
        graph,
        solar_system,
        named(star.name)
            .with_mesh(sphere(&star, Material::textured(star.name).constant()))
            .with_bloom()
            .with_animation(Animation::spin(star.spin_period, star.retrograde)),
    )?;

    let mut planet_labels = vec![add_label(graph, solar_system, &star, false)?];
    let mut orbits = BTreeMap::new();
    for planet in catalog.children_of(&star) {
        if !planet.is_planet() {
            return Err(Error::UnknownBody(planet.name.to_string()));
        }
        let (anchor, label) = add_planet(graph, catalog, solar_system, &planet)?;
        orbits.insert(planet.celestial, anchor);
        planet_labels.push(label);
    }

    log::info!(
        "built solar system at scale {} ({} nodes)",
        scale,
        graph.descendants(model_center).len()
    );

    Ok(BuiltSystem {
        model_center,
        background,
        solar_system,
        sun_light,
        sun,
        orbits,
        planet_labels,
    })
}

// ── Planets ──────────────────────────────────────────────────────────

/// Returns the planet's orbit anchor and its label.
fn add_planet(
    graph: &mut SceneGraph,
    catalog: &Catalog,
    parent: NodeId,
    planet: &Body,
) -> Result<(NodeId, NodeId)> {
    let anchor = add(
        graph,
        parent,
        named(orbit_name(planet.name)).with_animation(Animation::revolution(planet.orbit_period)),
    )?;
    let system = add(
        graph,
        anchor,
        named(system_name(planet.name)).with_transform(place_on_orbit(
            &Transform::IDENTITY,
            planet.orbit_start_angle,
            planet.orbit_distance,
        )),
    )?;

    if planet.has_satellites() {
        let satellites = add(
            graph,
            system,
            named(satellites_name(planet.name)).with_transform(tilted(planet.axial_tilt)),
        )?;
        add_orbit_rings(graph, catalog, satellites, planet)?;
        for moon in catalog.children_of(planet) {
            add_satellite(graph, satellites, &moon)?;
        }
    }

    let mut material = Material::textured(planet.name);
    if planet.celestial == Celestial::Earth {
        material = material.with_emission("earthNight");
    }
    let body = add(
        graph,
        system,
        named(planet.name)
            .with_transform(tilted(planet.axial_tilt))
            .with_mesh(sphere(planet, material))
            .with_animation(Animation::spin(planet.spin_period, planet.retrograde)),
    )?;

    let extent = planet.radius * AXIS_EXTENT;
    let axis = align_segment(
        Vec3::new(0.0, -extent, 0.0),
        Vec3::new(0.0, extent, 0.0),
        catalog.scale() / AXIS_RADIUS_DIVISOR,
    );
    add(
        graph,
        body,
        named(axis_name(planet.name))
            .with_transform(axis.transform)
            .with_mesh(Mesh::new(axis.shape, Material::flat(Color::CYAN))),
    )?;

    if let Some(width) = planet.ring_width {
        let plate = Mesh::new(
            Shape::Plate { width, length: width },
            Material::textured(format!("{}Ring", planet.name)).constant(),
        );
        add(graph, body, named(rings_name(planet.name)).with_mesh(plate))?;
    }

    let label = add_label(graph, system, planet, false)?;
    Ok((anchor, label))
}

fn add_satellite(graph: &mut SceneGraph, parent: NodeId, moon: &Body) -> Result<NodeId> {
    if !moon.is_moon() {
        return Err(Error::UnknownBody(moon.name.to_string()));
    }
    let anchor = add(
        graph,
        parent,
        named(orbit_name(moon.name))
            .with_transform(tilted(moon.orbit_inclination))
            .with_animation(Animation::revolution(moon.orbit_period)),
    )?;
    let node = add(
        graph,
        anchor,
        named(moon.name)
            .with_transform(place_on_orbit(&Transform::IDENTITY, moon.orbit_start_angle, moon.orbit_distance))
            .with_mesh(sphere(moon, Material::textured(moon.name)))
            .with_animation(Animation::spin(moon.spin_period, moon.retrograde)),
    )?;
    add_label(graph, node, moon, true)?;
    Ok(anchor)
}

/// One orbit ring per body orbiting `body`, as children of `parent`.
fn add_orbit_rings(graph: &mut SceneGraph, catalog: &Catalog, parent: NodeId, body: &Body) -> Result<()> {
    let pipe_radius = catalog.orbit_pipe_radius(body);
    let segments = catalog.orbit_ring_segments(body);
    for child in catalog.children_of(body) {
        let ring = Mesh::new(
            Shape::Torus { ring_radius: child.orbit_distance, pipe_radius, segments },
            Material::flat(Color::CYAN),
        );
        add(
            graph,
            parent,
            named(orbit_ring_name(body.name))
                .with_transform(tilted(child.orbit_inclination))
                .with_mesh(ring),
        )?;
    }
    Ok(())
}

/// Billboarded name tag floating above `body`.
fn add_label(graph: &mut SceneGraph, parent: NodeId, body: &Body, hidden: bool) -> Result<NodeId> {
    let text = Shape::Text {
        text: body.celestial.params().label.to_string(),
        extrusion: body.label_scale * 20.0,
        font_size: body.label_scale * 100.0,
    };
    let offset = (body.radius * 2.0).max(body.label_scale * LABEL_MIN_OFFSET);
    let transform = Transform::from_translation(Vec3::new(0.0, offset, 0.0))
        .with_scale(Vec3::splat(LABEL_NODE_SCALE));

    let mut node = named(label_name(body.name))
        .with_transform(transform)
        .with_mesh(Mesh::new(text, Material::flat(Color::CYAN).double_sided()))
        .billboarded();
    node.hidden = hidden;
    add(graph, parent, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BodyKind;

    fn built(scale: f32) -> (SceneGraph, BuiltSystem) {
        let mut graph = SceneGraph::new();
        let system = build_system(&mut graph, &Catalog::new(scale), &Transform::IDENTITY).unwrap();
        (graph, system)
    }

    #[test]
    fn every_body_gets_a_named_node() {
        let (graph, system) = built(1.0);
        for c in Celestial::ALL {
            let id = graph.find_in_subtree(system.solar_system, c.name());
            assert!(id.is_some(), "missing node for {}", c.name());
            assert!(graph.get(id.unwrap()).unwrap().mesh().is_some());
        }
    }

    #[test]
    fn model_center_sits_in_front_of_camera() {
        let mut graph = SceneGraph::new();
        let camera = Transform::from_translation(Vec3::new(0.0, 1.5, 0.0))
            .with_rotation(Quat::from_rotation_y(0.3));
        let system = build_system(&mut graph, &Catalog::new(2.0), &camera).unwrap();
        let center = graph.get(system.model_center).unwrap().transform;
        let expected = camera.transform_point(Vec3::new(0.0, 0.0, -2.2));
        assert!((center.translation - expected).length() < 1e-4);
        assert_eq!(center.rotation, Quat::IDENTITY);
        assert_eq!(graph.parent(system.model_center), Some(NodeId::ROOT));
    }

    #[test]
    fn model_center_holds_background_then_system() {
        let (graph, system) = built(1.0);
        assert_eq!(graph.children(system.model_center), &[system.background, system.solar_system]);
        let background = graph.get(system.background).unwrap();
        assert!(background.hidden);
        match &background.mesh().unwrap().shape {
            Shape::Sphere { radius, .. } => assert_eq!(*radius, 5.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn planet_chain_is_anchor_system_body() {
        let (graph, system) = built(1.0);
        let anchor = system.orbits[&Celestial::Earth];
        let earth_system = graph.find_child(anchor, "earth system").unwrap();
        let earth = graph.find_child(earth_system, "earth").unwrap();
        assert!(graph.find_child(earth_system, "earth-satellites").is_some());
        assert!(graph.find_child(earth_system, "earth-label").is_some());
        assert!(graph.find_child(earth, "earth-axis").is_some());

        let material = &graph.get(earth).unwrap().mesh().unwrap().material;
        assert_eq!(material.emission.as_deref(), Some("earthNight"));

        let distance = graph.get(earth_system).unwrap().transform.translation.length();
        assert!((distance - Catalog::new(1.0).body(Celestial::Earth).orbit_distance).abs() < 1e-5);
    }

    #[test]
    fn orbit_index_covers_every_planet() {
        let (graph, system) = built(1.0);
        assert_eq!(system.orbits.len(), 8);
        for (planet, anchor) in &system.orbits {
            assert_eq!(planet.kind(), BodyKind::Planet);
            let node = graph.get(*anchor).unwrap();
            assert!(node.animating);
            assert_eq!(node.name, format!("{}-orbit", planet.name()));
        }
        assert_eq!(system.planet_labels.len(), 9);
    }

    #[test]
    fn orbit_rings_per_parent() {
        let (graph, system) = built(1.0);
        let count = |parent: NodeId, name: &str| {
            graph.children(parent).iter().filter(|id| graph.name(**id) == Some(name)).count()
        };
        assert_eq!(count(system.solar_system, "sun-lineOrbit"), 8);
        let sats = graph.find_by_name("jupiter-satellites").unwrap();
        assert_eq!(count(sats, "jupiter-lineOrbit"), 4);
        let ring = graph.find_child(sats, "jupiter-lineOrbit").unwrap();
        match &graph.get(ring).unwrap().mesh().unwrap().shape {
            Shape::Torus { segments, pipe_radius, .. } => {
                assert_eq!(*segments, 200);
                assert!((pipe_radius - 1.0 / 7500.0).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ringed_planets_get_plates() {
        let (graph, _) = built(1.0);
        let catalog = Catalog::new(1.0);
        for (planet, factor) in [(Celestial::Saturn, 5.0), (Celestial::Uranus, 3.5)] {
            let rings = graph.find_by_name(&rings_name(planet.name())).unwrap();
            let expected = catalog.body(planet).radius * factor;
            match &graph.get(rings).unwrap().mesh().unwrap().shape {
                Shape::Plate { width, .. } => assert!((width - expected).abs() < 1e-6),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!(graph.find_by_name("earth-rings").is_none());
    }

    #[test]
    fn moon_labels_start_hidden() {
        let (graph, _) = built(1.0);
        for moon in Celestial::ALL.iter().filter(|c| c.kind() == BodyKind::Moon) {
            let label = graph.find_by_name(&label_name(moon.name())).unwrap();
            assert!(graph.get(label).unwrap().hidden, "{} label visible", moon.name());
        }
        let earth_label = graph.find_by_name("earth-label").unwrap();
        let node = graph.get(earth_label).unwrap();
        assert!(!node.hidden);
        assert!(node.billboard);
        match &node.mesh().unwrap().shape {
            Shape::Text { text, .. } => assert_eq!(text, "Earth"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn sun_glows_and_spins() {
        let (graph, system) = built(1.0);
        let sun = graph.get(system.sun).unwrap();
        assert!(sun.bloom);
        assert_eq!(sun.animation.unwrap().period, 30.0);
        let light = graph.get(system.sun_light).unwrap().light().unwrap();
        assert_eq!(light.intensity, 1000.0);
        assert!(light.enabled);
    }

    #[test]
    fn retrograde_planets_spin_backwards() {
        let (graph, _) = built(1.0);
        for (name, retro) in [("venus", true), ("uranus", true), ("earth", false)] {
            let id = graph.find_by_name(name).unwrap();
            assert_eq!(graph.get(id).unwrap().animation.unwrap().retrograde, retro, "{}", name);
        }
    }

    #[test]
    fn invalid_scale_is_rejected() {
        let mut graph = SceneGraph::new();
        let result = build_system(&mut graph, &Catalog::new(0.0), &Transform::IDENTITY);
        assert!(matches!(result, Err(Error::InvalidScale(_))));
        assert_eq!(graph.len(), 2);
    }
}
