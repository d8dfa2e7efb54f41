/// Body table: display parameters for every celestial body.
///
/// Radii and orbits are fractions of the system scale and are tuned for
/// readability, not physical consistency. Orbit periods are animation seconds
/// for one full revolution (derived from the real period, compressed per body).

use serde::{Deserialize, Serialize};

use super::info::CelestialInfo;

/// Identity of every body in the catalog, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Celestial {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Moon,
    Io,
    Europa,
    Ganymede,
    Callisto,
    Titan,
    Triton,
}

pub const BODY_COUNT: usize = 16;

/// Kind of body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
}

/// Static display parameters of one body, independent of the system scale.
#[derive(Debug, Clone)]
pub struct BodyParams {
    /// Lookup key and node name.
    pub name: &'static str,
    /// Text shown on the body's label.
    pub label: &'static str,
    pub kind: BodyKind,
    /// Sphere radius as a fraction of the system scale.
    pub radius: f32,
    /// Orbit radius as a fraction of the system scale (0 for the star).
    pub orbit: f32,
    /// Initial angle on the orbit in degrees.
    pub start_angle: f32,
    /// Seconds per revolution (0 = no revolution).
    pub orbit_period: f32,
    /// Axial tilt in degrees.
    pub axial_tilt: f32,
    /// Orbit plane inclination in degrees.
    pub orbit_inclination: f32,
    /// Seconds per spin about the body's own axis.
    pub spin_period: f32,
    /// Ring plate width as a multiple of the body radius.
    pub ring_width: Option<f32>,
    /// Label size as a fraction of the system scale.
    pub label_scale: f32,
    pub satellites: &'static [Celestial],
    pub info: CelestialInfo,
}

/// Per-body zoom tuning. These are empirical visual constants with no
/// underlying formula, so they live in a table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomProfile {
    /// Divides the ring-fit radius into the framing height (ringed planets only).
    pub ring_vertical_divisor: Option<f32>,
    /// Divides the framing distance into the depth of the re-zoom nudge.
    pub rezoom_distance_divisor: f32,
    /// Divides the framing distance into the height of the re-zoom nudge.
    pub rezoom_vertical_divisor: f32,
}

// ── Spin ─────────────────────────────────────────────────────────────

pub const STAR_SPIN_PERIOD: f32 = 30.0;
pub const PLANET_SPIN_PERIOD: f32 = 15.0;
pub const MOON_SPIN_PERIOD: f32 = 10.0;

// ── Zoom tuning ──────────────────────────────────────────────────────

const SATURN_ZOOM: ZoomProfile = ZoomProfile {
    ring_vertical_divisor: Some(3.0),
    rezoom_distance_divisor: 1.57,
    rezoom_vertical_divisor: 9.4,
};

const URANUS_ZOOM: ZoomProfile = ZoomProfile {
    ring_vertical_divisor: Some(4.0),
    rezoom_distance_divisor: 2.09,
    rezoom_vertical_divisor: 11.7,
};

const DEFAULT_ZOOM: ZoomProfile = ZoomProfile {
    ring_vertical_divisor: None,
    rezoom_distance_divisor: 2.47,
    rezoom_vertical_divisor: 7.60,
};

// ── Satellites ───────────────────────────────────────────────────────

const SUN_SATELLITES: &[Celestial] = &[
    Celestial::Mercury,
    Celestial::Venus,
    Celestial::Earth,
    Celestial::Mars,
    Celestial::Jupiter,
    Celestial::Saturn,
    Celestial::Uranus,
    Celestial::Neptune,
];
const EARTH_SATELLITES: &[Celestial] = &[Celestial::Moon];
const JUPITER_SATELLITES: &[Celestial] = &[
    Celestial::Io,
    Celestial::Europa,
    Celestial::Ganymede,
    Celestial::Callisto,
];
const SATURN_SATELLITES: &[Celestial] = &[Celestial::Titan];
const NEPTUNE_SATELLITES: &[Celestial] = &[Celestial::Triton];

// ── Table ────────────────────────────────────────────────────────────

/// Indexed by `Celestial as usize`.
static BODY_TABLE: [BodyParams; BODY_COUNT] = [
    BodyParams {
        name: "sun", label: "Sun", kind: BodyKind::Star,
        radius: 1.0 / 10.0, orbit: 0.0, start_angle: 0.0, orbit_period: 0.0,
        axial_tilt: 0.0, orbit_inclination: 0.0, spin_period: STAR_SPIN_PERIOD,
        ring_width: None, label_scale: 1.0, satellites: SUN_SATELLITES,
        info: CelestialInfo::SUN,
    },
    BodyParams {
        name: "mercury", label: "Mercury", kind: BodyKind::Planet,
        radius: 0.7 / 150.0, orbit: 0.14, start_angle: -160.0, orbit_period: 88.0 / 2.0,
        axial_tilt: 2.0, orbit_inclination: 0.0, spin_period: PLANET_SPIN_PERIOD,
        ring_width: None, label_scale: 1.0, satellites: &[],
        info: CelestialInfo::MERCURY,
    },
    BodyParams {
        name: "venus", label: "Venus", kind: BodyKind::Planet,
        radius: 1.15 / 150.0, orbit: 0.18, start_angle: 130.0, orbit_period: 224.0 / 3.0,
        axial_tilt: 2.0, orbit_inclination: 0.0, spin_period: PLANET_SPIN_PERIOD,
        ring_width: None, label_scale: 1.0, satellites: &[],
        info: CelestialInfo::VENUS,
    },
    BodyParams {
        name: "earth", label: "Earth", kind: BodyKind::Planet,
        radius: 1.2 / 150.0, orbit: 0.25, start_angle: -90.0, orbit_period: 365.0 / 3.0,
        axial_tilt: -7.0, orbit_inclination: 0.0, spin_period: PLANET_SPIN_PERIOD,
        ring_width: None, label_scale: 1.0, satellites: EARTH_SATELLITES,
        info: CelestialInfo::EARTH,
    },
    BodyParams {
        name: "mars", label: "Mars", kind: BodyKind::Planet,
        radius: 0.8 / 150.0, orbit: 0.32, start_angle: -100.0, orbit_period: 687.0 / 5.0,
        axial_tilt: 25.0, orbit_inclination: 0.0, spin_period: PLANET_SPIN_PERIOD,
        ring_width: None, label_scale: 1.0, satellites: &[],
        info: CelestialInfo::MARS,
    },
    BodyParams {
        name: "jupiter", label: "Jupiter", kind: BodyKind::Planet,
        radius: 5.5 / 150.0, orbit: 0.45, start_angle: -150.0, orbit_period: 12.0 * 365.0 / 24.0,
        axial_tilt: -3.0, orbit_inclination: 0.0, spin_period: PLANET_SPIN_PERIOD,
        ring_width: None, label_scale: 1.0, satellites: JUPITER_SATELLITES,
        info: CelestialInfo::JUPITER,
    },
    BodyParams {
        name: "saturn", label: "Saturn", kind: BodyKind::Planet,
        radius: 3.2 / 150.0, orbit: 0.70, start_angle: 130.0, orbit_period: 29.0 * 365.0 / 50.0,
        axial_tilt: -27.0, orbit_inclination: 0.0, spin_period: PLANET_SPIN_PERIOD,
        ring_width: Some(5.0), label_scale: 1.0, satellites: SATURN_SATELLITES,
        info: CelestialInfo::SATURN,
    },
    BodyParams {
        name: "uranus", label: "Uranus", kind: BodyKind::Planet,
        radius: 2.5 / 150.0, orbit: 0.88, start_angle: -135.0, orbit_period: 84.0 * 365.0 / 135.0,
        axial_tilt: 82.0, orbit_inclination: 0.0, spin_period: PLANET_SPIN_PERIOD,
        ring_width: Some(3.5), label_scale: 1.0, satellites: &[],
        info: CelestialInfo::URANUS,
    },
    BodyParams {
        name: "neptune", label: "Neptune", kind: BodyKind::Planet,
        radius: 2.4 / 150.0, orbit: 1.00, start_angle: 175.0, orbit_period: 164.0 * 365.0 / 240.0,
        axial_tilt: 28.0, orbit_inclination: 0.0, spin_period: PLANET_SPIN_PERIOD,
        ring_width: None, label_scale: 1.0, satellites: NEPTUNE_SATELLITES,
        info: CelestialInfo::NEPTUNE,
    },
    BodyParams {
        name: "moon", label: "Moon", kind: BodyKind::Moon,
        radius: 0.5 / 150.0, orbit: 0.035, start_angle: -120.0, orbit_period: 27.0 * 3.0,
        axial_tilt: 0.0, orbit_inclination: 0.0, spin_period: MOON_SPIN_PERIOD,
        ring_width: None, label_scale: 0.15, satellites: &[],
        info: CelestialInfo::MOON,
    },
    BodyParams {
        name: "io", label: "Io", kind: BodyKind::Moon,
        radius: 0.6 / 150.0, orbit: 0.055, start_angle: -120.0, orbit_period: 2.0 * 20.0,
        axial_tilt: 0.0, orbit_inclination: 0.0, spin_period: MOON_SPIN_PERIOD,
        ring_width: None, label_scale: 0.4, satellites: &[],
        info: CelestialInfo::IO,
    },
    BodyParams {
        name: "europa", label: "Europa", kind: BodyKind::Moon,
        radius: 0.55 / 150.0, orbit: 0.065, start_angle: -70.0, orbit_period: 4.0 * 20.0,
        axial_tilt: 0.0, orbit_inclination: 0.0, spin_period: MOON_SPIN_PERIOD,
        ring_width: None, label_scale: 0.4, satellites: &[],
        info: CelestialInfo::EUROPA,
    },
    BodyParams {
        name: "ganymede", label: "Ganymede", kind: BodyKind::Moon,
        radius: 0.7 / 150.0, orbit: 0.08, start_angle: 40.0, orbit_period: 8.0 * 15.0,
        axial_tilt: 0.0, orbit_inclination: 0.0, spin_period: MOON_SPIN_PERIOD,
        ring_width: None, label_scale: 0.4, satellites: &[],
        info: CelestialInfo::GANYMEDE,
    },
    BodyParams {
        name: "callisto", label: "Callisto", kind: BodyKind::Moon,
        radius: 0.7 / 150.0, orbit: 0.10, start_angle: 110.0, orbit_period: 17.0 * 9.0,
        axial_tilt: 0.0, orbit_inclination: 0.0, spin_period: MOON_SPIN_PERIOD,
        ring_width: None, label_scale: 0.4, satellites: &[],
        info: CelestialInfo::CALLISTO,
    },
    BodyParams {
        name: "titan", label: "Titan", kind: BodyKind::Moon,
        radius: 0.7 / 150.0, orbit: 0.075, start_angle: -100.0, orbit_period: 16.0 * 7.0,
        axial_tilt: 0.0, orbit_inclination: 0.0, spin_period: MOON_SPIN_PERIOD,
        ring_width: None, label_scale: 0.35, satellites: &[],
        info: CelestialInfo::TITAN,
    },
    BodyParams {
        name: "triton", label: "Triton", kind: BodyKind::Moon,
        radius: 0.5 / 150.0, orbit: 0.055, start_angle: 20.0, orbit_period: 6.0 * 15.0,
        axial_tilt: 0.0, orbit_inclination: -(180.0 - 129.0), spin_period: MOON_SPIN_PERIOD,
        ring_width: None, label_scale: 0.25, satellites: &[],
        info: CelestialInfo::TRITON,
    },
];

impl Celestial {
    /// Every body in declaration order: star, planets, moons.
    pub const ALL: [Celestial; BODY_COUNT] = [
        Celestial::Sun,
        Celestial::Mercury,
        Celestial::Venus,
        Celestial::Earth,
        Celestial::Mars,
        Celestial::Jupiter,
        Celestial::Saturn,
        Celestial::Uranus,
        Celestial::Neptune,
        Celestial::Moon,
        Celestial::Io,
        Celestial::Europa,
        Celestial::Ganymede,
        Celestial::Callisto,
        Celestial::Titan,
        Celestial::Triton,
    ];

    /// Static parameters for this body.
    pub fn params(self) -> &'static BodyParams {
        &BODY_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.params().name
    }

    pub fn kind(self) -> BodyKind {
        self.params().kind
    }

    pub fn satellites(self) -> &'static [Celestial] {
        self.params().satellites
    }

    /// Resolve a node or body name (e.g. `"earth"`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// The body this one orbits, if any.
    pub fn parent(self) -> Option<Celestial> {
        Self::ALL.iter().copied().find(|c| c.satellites().contains(&self))
    }

    pub fn info(self) -> CelestialInfo {
        self.params().info
    }

    /// Spin runs clockwise for bodies with a negative real rotation period.
    pub fn is_retrograde(self) -> bool {
        self.params().info.rotation_period < 0.0
    }

    pub fn zoom_profile(self) -> ZoomProfile {
        match self {
            Celestial::Saturn => SATURN_ZOOM,
            Celestial::Uranus => URANUS_ZOOM,
            _ => DEFAULT_ZOOM,
        }
    }
}
