pub mod headless;
pub mod traits;

// Re-export key types for convenient access
pub use headless::{HeadlessBackend, MirroredNode};
pub use traits::{Fade, Hit, HitTester, RenderBackend, RenderCommand};
