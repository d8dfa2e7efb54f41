/// Physical facts shown in the info panel, relative to Earth where noted.
/// Formatting for display is left to the UI layer.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CelestialInfo {
    /// Mean radius in Earth radii.
    pub radius: f64,
    /// Mass in Earth masses.
    pub mass: f64,
    /// Surface gravity in g.
    pub gravity: f64,
    /// Orbital radius in millions of km.
    pub orbital_radius: Option<f64>,
    /// Orbital period in days.
    pub orbital_period: Option<f64>,
    /// Sidereal rotation period in days, negative for retrograde rotation.
    pub rotation_period: f64,
    pub url: &'static str,
}

impl CelestialInfo {
    const fn new(
        radius: f64,
        mass: f64,
        gravity: f64,
        orbital_radius: Option<f64>,
        orbital_period: Option<f64>,
        rotation_period: f64,
        url: &'static str,
    ) -> Self {
        Self { radius, mass, gravity, orbital_radius, orbital_period, rotation_period, url }
    }

    pub const SUN: Self = Self::new(109.00, 332_950.0, 28.00, None, None, 25.0,
        "https://en.wikipedia.org/wiki/Sun");
    pub const MERCURY: Self = Self::new(0.38, 0.06, 0.38, Some(57.9), Some(116.0), 59.0,
        "https://en.wikipedia.org/wiki/Mercury_(planet)");
    pub const VENUS: Self = Self::new(0.95, 0.82, 0.90, Some(108.2), Some(225.0), -243.0,
        "https://en.wikipedia.org/wiki/Venus");
    pub const EARTH: Self = Self::new(1.0, 1.0, 1.0, Some(149.6), Some(365.0), 0.9973,
        "https://en.wikipedia.org/wiki/Earth");
    pub const MARS: Self = Self::new(0.53, 0.11, 0.38, Some(227.9), Some(687.0), 1.026,
        "https://en.wikipedia.org/wiki/Mars");
    pub const JUPITER: Self = Self::new(10.97, 318.0, 2.53, Some(778.4), Some(4_332.0), 0.4135,
        "https://en.wikipedia.org/wiki/Jupiter");
    pub const SATURN: Self = Self::new(9.14, 95.0, 1.06, Some(1_433.0), Some(10_759.0), 0.4396,
        "https://en.wikipedia.org/wiki/Saturn");
    pub const URANUS: Self = Self::new(4.00, 15.0, 0.89, Some(2_871.0), Some(30_688.0), -0.7181,
        "https://en.wikipedia.org/wiki/Uranus");
    pub const NEPTUNE: Self = Self::new(3.86, 17.0, 1.14, Some(4_500.0), Some(60_195.0), 0.6713,
        "https://en.wikipedia.org/wiki/Neptune");

    pub const MOON: Self = Self::new(0.27, 0.01, 0.16, Some(0.384399), Some(27.0), 27.0,
        "https://en.wikipedia.org/wiki/Moon");
    pub const IO: Self = Self::new(0.29, 0.02, 0.18, Some(0.421700), Some(1.7691), 1.7691,
        "https://en.wikipedia.org/wiki/Io_(moon)");
    pub const EUROPA: Self = Self::new(0.24, 0.008, 0.13, Some(0.670900), Some(4.0), 4.0,
        "https://en.wikipedia.org/wiki/Europa_(moon)");
    pub const GANYMEDE: Self = Self::new(0.41, 0.03, 0.15, Some(1.1), Some(7.0), 7.0,
        "https://en.wikipedia.org/wiki/Ganymede_(moon)");
    pub const CALLISTO: Self = Self::new(0.38, 0.02, 0.13, Some(1.9), Some(17.0), 17.0,
        "https://en.wikipedia.org/wiki/Callisto_(moon)");
    pub const TITAN: Self = Self::new(0.40, 0.02, 0.14, Some(1.2), Some(16.0), 16.0,
        "https://en.wikipedia.org/wiki/Titan_(moon)");
    pub const TRITON: Self = Self::new(0.21, 0.003, 0.08, Some(0.354759), Some(6.0), 6.0,
        "https://en.wikipedia.org/wiki/Triton_(moon)");
}
