use serde::Serialize;

use crate::catalog::Celestial;
use crate::systems::selection::ZoomLevel;

/// Unique identifier for a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// World root owned by the AR host.
    pub const ROOT: NodeId = NodeId(0);
    /// Camera (point of view) node, a child of the root that tracks the device.
    pub const CAMERA: NodeId = NodeId(1);
}

/// Handle for one asynchronous fade or move run by the render backend.
/// The backend reports it back through `Session::on_fade_complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FadeTicket(pub u32);

/// Fade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FadeDirection {
    In,
    Out,
}

impl FadeDirection {
    /// Target opacity at the end of the fade.
    pub fn target_opacity(self) -> f32 {
        match self {
            FadeDirection::In => 1.0,
            FadeDirection::Out => 0.0,
        }
    }
}

/// A session event communicated from the core to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The system was built and attached in front of the camera.
    Built { scale: f32 },
    /// The session was torn down.
    Reset,
    /// A body or planet system finished its zoom-in fade.
    Focused { body: Celestial, level: ZoomLevel },
    /// The user backed out to `level`.
    Returned { level: ZoomLevel },
    /// Pause/play toggled at `level`.
    PlaybackChanged { level: ZoomLevel, playing: bool },
    /// Label visibility toggled.
    LabelsChanged { visible: bool },
}
