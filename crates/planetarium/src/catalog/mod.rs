//! Body catalog: static per-body parameters resolved against a system scale.
//!
//! Pure data and lookup. Nothing here mutates.

pub mod bodies;
pub mod info;

pub use bodies::{BodyKind, BodyParams, Celestial, ZoomProfile};
pub use info::CelestialInfo;

use serde::Serialize;

/// Bodies selectable at level one without the unlocked feature.
pub const FREE_TIER: [Celestial; 5] = [
    Celestial::Sun,
    Celestial::Mercury,
    Celestial::Venus,
    Celestial::Earth,
    Celestial::Mars,
];

/// Orbit ring tube radius divisors (system scale / divisor).
const STAR_ORBIT_PIPE_DIVISOR: f32 = 5000.0;
const PLANET_ORBIT_PIPE_DIVISOR: f32 = 7500.0;

/// One catalog entry with every length resolved to display units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Body {
    pub celestial: Celestial,
    pub kind: BodyKind,
    pub name: &'static str,
    pub radius: f32,
    pub orbit_distance: f32,
    pub orbit_start_angle: f32,
    pub orbit_period: f32,
    pub axial_tilt: f32,
    pub orbit_inclination: f32,
    pub spin_period: f32,
    pub retrograde: bool,
    /// Ring plate width in display units, for ringed bodies.
    pub ring_width: Option<f32>,
    pub label_scale: f32,
    pub children: &'static [Celestial],
}

impl Body {
    pub fn is_star(&self) -> bool {
        self.kind == BodyKind::Star
    }

    pub fn is_planet(&self) -> bool {
        self.kind == BodyKind::Planet
    }

    pub fn is_moon(&self) -> bool {
        self.kind == BodyKind::Moon
    }

    pub fn has_rings(&self) -> bool {
        self.ring_width.is_some()
    }

    pub fn has_satellites(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The catalog for one system scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catalog {
    scale: f32,
}

impl Catalog {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn body(&self, celestial: Celestial) -> Body {
        let p = celestial.params();
        let s = self.scale;
        let radius = p.radius * s;
        Body {
            celestial,
            kind: p.kind,
            name: p.name,
            radius,
            orbit_distance: p.orbit * s,
            orbit_start_angle: p.start_angle,
            orbit_period: p.orbit_period,
            axial_tilt: p.axial_tilt,
            orbit_inclination: p.orbit_inclination,
            spin_period: p.spin_period,
            retrograde: celestial.is_retrograde(),
            ring_width: p.ring_width.map(|w| radius * w),
            label_scale: p.label_scale * s,
            children: p.satellites,
        }
    }

    /// Every body: star, planets, moons.
    pub fn all_bodies(&self) -> Vec<Body> {
        Celestial::ALL.iter().map(|c| self.body(*c)).collect()
    }

    /// The star followed by the bodies orbiting it directly.
    pub fn top_level(&self) -> Vec<Body> {
        let star = self.body(Celestial::Sun);
        let mut bodies = self.children_of(&star);
        bodies.insert(0, star);
        bodies
    }

    pub fn children_of(&self, body: &Body) -> Vec<Body> {
        body.children.iter().map(|c| self.body(*c)).collect()
    }

    /// Tube radius of the orbit rings drawn around `parent`.
    pub fn orbit_pipe_radius(&self, parent: &Body) -> f32 {
        let divisor = if parent.is_star() {
            STAR_ORBIT_PIPE_DIVISOR
        } else {
            PLANET_ORBIT_PIPE_DIVISOR
        };
        self.scale / divisor
    }

    /// Ring segment count for the orbit rings drawn around `parent`.
    pub fn orbit_ring_segments(&self, parent: &Body) -> u32 {
        if parent.is_planet() { 200 } else { 100 }
    }

    /// Whether `celestial` may be picked from the full system view.
    pub fn selectable_at_level_one(celestial: Celestial, unlocked: bool) -> bool {
        if unlocked {
            celestial.kind() != BodyKind::Moon
        } else {
            FREE_TIER.contains(&celestial)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_is_star_plus_eight_planets() {
        let catalog = Catalog::new(1.0);
        let top = catalog.top_level();
        assert_eq!(top.len(), 9);
        assert!(top[0].is_star());
        assert!(top[1..].iter().all(|b| b.is_planet()));
    }

    #[test]
    fn all_bodies_lists_moons_last() {
        let bodies = Catalog::new(1.0).all_bodies();
        assert_eq!(bodies.len(), 16);
        assert!(bodies[9..].iter().all(|b| b.is_moon()));
    }

    #[test]
    fn lengths_scale_with_system() {
        let catalog = Catalog::new(2.0);
        let sun = catalog.body(Celestial::Sun);
        assert_eq!(sun.radius, 0.2);
        assert_eq!(sun.orbit_distance, 0.0);
        let neptune = catalog.body(Celestial::Neptune);
        assert_eq!(neptune.orbit_distance, 2.0);
        // Periods do not depend on the scale.
        assert_eq!(neptune.orbit_period, Catalog::new(1.0).body(Celestial::Neptune).orbit_period);
    }

    #[test]
    fn ring_width_follows_radius() {
        let catalog = Catalog::new(1.0);
        let saturn = catalog.body(Celestial::Saturn);
        assert!((saturn.ring_width.unwrap() - saturn.radius * 5.0).abs() < 1e-6);
        assert!(catalog.body(Celestial::Uranus).has_rings());
        assert!(!catalog.body(Celestial::Earth).has_rings());
    }

    #[test]
    fn children_of_satellite_less_body_is_empty() {
        let catalog = Catalog::new(1.0);
        assert!(catalog.children_of(&catalog.body(Celestial::Mars)).is_empty());
        let jupiter = catalog.children_of(&catalog.body(Celestial::Jupiter));
        let names: Vec<_> = jupiter.iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["io", "europa", "ganymede", "callisto"]);
    }

    #[test]
    fn licensing_gates_outer_planets() {
        assert!(Catalog::selectable_at_level_one(Celestial::Earth, false));
        assert!(!Catalog::selectable_at_level_one(Celestial::Jupiter, false));
        assert!(Catalog::selectable_at_level_one(Celestial::Jupiter, true));
        assert!(!Catalog::selectable_at_level_one(Celestial::Moon, true));
    }

    #[test]
    fn orbit_rings_are_thinner_around_planets() {
        let catalog = Catalog::new(1.0);
        let sun = catalog.body(Celestial::Sun);
        let earth = catalog.body(Celestial::Earth);
        assert!(catalog.orbit_pipe_radius(&earth) < catalog.orbit_pipe_radius(&sun));
        assert_eq!(catalog.orbit_ring_segments(&earth), 200);
        assert_eq!(catalog.orbit_ring_segments(&sun), 100);
    }
}
