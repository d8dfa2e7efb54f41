// extensions/mod.rs
//
// Math and timing helpers shared by the scene builder and render backends.
// Nothing here knows about the selection state machine.

pub mod easing;
pub mod transform;
pub mod tween;

pub use easing::{ease, ease_vec3, lerp, lerp_vec3, Easing};
pub use transform::{align_segment, place_on_orbit, tilt_axis, Segment, Transform};
pub use tween::{Tween, TweenSink, TweenState, TweenTarget};
