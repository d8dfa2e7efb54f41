/// Display-ready geometry and lighting carried by scene nodes.
/// Asset names are opaque to the core; the host resolves them.

use serde::{Deserialize, Serialize};

/// RGB color, linear 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const CYAN: Self = Self::new(0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Geometric primitive. All lengths in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Sphere { radius: f32, segments: u32 },
    /// Ring of radius `ring_radius` in the local XZ plane.
    Torus { ring_radius: f32, pipe_radius: f32, segments: u32 },
    /// Flat square in the local XZ plane.
    Plate { width: f32, length: f32 },
    /// Cylinder along local +Y, centered on the origin.
    Cylinder { radius: f32, height: f32 },
    Text { text: String, extrusion: f32, font_size: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lighting {
    /// Shaded by scene lights.
    #[default]
    Lit,
    /// Unaffected by lights (sun, orbit rings, labels, background).
    Constant,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse texture asset name.
    pub texture: Option<String>,
    pub color: Option<Color>,
    /// Emission texture asset name.
    pub emission: Option<String>,
    pub lighting: Lighting,
    pub double_sided: bool,
}

impl Material {
    pub fn textured(name: impl Into<String>) -> Self {
        Self { texture: Some(name.into()), ..Default::default() }
    }

    pub fn flat(color: Color) -> Self {
        Self { color: Some(color), lighting: Lighting::Constant, ..Default::default() }
    }

    pub fn with_emission(mut self, name: impl Into<String>) -> Self {
        self.emission = Some(name.into());
        self
    }

    pub fn constant(mut self) -> Self {
        self.lighting = Lighting::Constant;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }
}

/// A shape with its material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub shape: Shape,
    pub material: Material,
}

impl Mesh {
    pub fn new(shape: Shape, material: Material) -> Self {
        Self { shape, material }
    }
}

/// Omnidirectional point light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OmniLight {
    pub intensity: f32,
    pub color: Color,
    /// Disabled lights stay in the graph but illuminate nothing.
    pub enabled: bool,
}

impl OmniLight {
    pub fn new(intensity: f32) -> Self {
        Self { intensity, color: Color::WHITE, enabled: true }
    }
}

/// What a node draws or emits, if anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "payload", rename_all = "snake_case")]
pub enum Payload {
    Mesh(Mesh),
    Light(OmniLight),
}
