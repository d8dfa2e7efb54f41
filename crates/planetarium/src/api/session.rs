use glam::Vec2;

use crate::api::types::{FadeTicket, NodeId, SessionEvent};
use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::core::scene::SceneGraph;
use crate::extensions::transform::Transform;
use crate::input::queue::InputEvent;
use crate::renderer::traits::{HitTester, RenderBackend};
use crate::systems::build::{build_system, BuiltSystem};
use crate::systems::selection::{SceneContext, SelectionState, ZoomLevel};

/// One viewing session: the scene graph, the built system and the
/// selection state, driven by UI input and fade completions.
///
/// Inbound calls never fail. Problems are logged and the input is dropped.
pub struct Session {
    config: SessionConfig,
    graph: SceneGraph,
    scale: f32,
    system: Option<BuiltSystem>,
    selection: SelectionState,
    background_opacity: f32,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            scale: config.default_scale,
            background_opacity: config.background_opacity,
            config,
            graph: SceneGraph::new(),
            system: None,
            selection: SelectionState::new(),
            events: Vec::new(),
        }
    }

    // -- State --

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Current system scale in display units.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_built(&self) -> bool {
        self.system.is_some()
    }

    pub fn system(&self) -> Option<&BuiltSystem> {
        self.system.as_ref()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.selection.level()
    }

    pub fn background_opacity(&self) -> f32 {
        self.background_opacity
    }

    /// Name of a node, for hosts mapping ids back to their own objects.
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.graph.name(id)
    }

    /// Persisted purchase state, supplied by the host.
    pub fn set_feature_unlocked(&mut self, unlocked: bool) {
        self.config.feature_unlocked = unlocked;
    }

    /// Events for the UI layer since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn with_scene<R>(
        &mut self,
        backend: &mut dyn RenderBackend,
        f: impl FnOnce(&mut SelectionState, &mut SceneContext) -> R,
    ) -> Option<R> {
        let Session { config, graph, system, selection, events, .. } = self;
        let Some(system) = system.as_ref() else {
            log::debug!("no system built yet");
            return None;
        };
        let mut ctx = SceneContext { graph, backend, system, config, events };
        Some(f(selection, &mut ctx))
    }

    // -- Inbound --

    /// Track the device camera. The system is placed relative to the pose
    /// current when the scale is confirmed.
    pub fn update_camera(&mut self, transform: Transform) {
        if let Some(camera) = self.graph.get_mut(NodeId::CAMERA) {
            camera.transform = transform;
        }
    }

    /// Build the system at the scale typed by the user.
    pub fn on_scale_confirmed(&mut self, text: Option<&str>, backend: &mut dyn RenderBackend) {
        if self.system.is_some() {
            log::debug!("system already built");
            return;
        }
        let scale = self.config.parse_scale(text);
        let camera = self
            .graph
            .get(NodeId::CAMERA)
            .map(|c| c.transform)
            .unwrap_or_default();

        match build_system(&mut self.graph, &Catalog::new(scale), &camera) {
            Ok(system) => {
                self.scale = scale;
                self.selection.reset();
                backend.attach_node(&self.graph, system.model_center);
                self.system = Some(system);
                self.apply_background(backend);
                self.events.push(SessionEvent::Built { scale });
                log::info!("session started at scale {}", scale);
            }
            Err(e) => {
                log::error!("failed to build solar system: {}", e);
                self.graph.clear();
            }
        }
    }

    pub fn on_tap(&mut self, point: Vec2, hits: &dyn HitTester, backend: &mut dyn RenderBackend) {
        self.with_scene(backend, |selection, ctx| selection.tap(ctx, || hits.hit_test(point)));
    }

    pub fn on_back_pressed(&mut self, backend: &mut dyn RenderBackend) {
        self.with_scene(backend, |selection, ctx| selection.back(ctx));
    }

    pub fn on_pause_play_toggled(&mut self, backend: &mut dyn RenderBackend) {
        self.with_scene(backend, |selection, ctx| selection.toggle_playback(ctx));
    }

    pub fn on_labels_toggled(&mut self, backend: &mut dyn RenderBackend) {
        self.with_scene(backend, |selection, ctx| selection.toggle_labels(ctx));
    }

    /// The backend finished (or cut short) the fade issued with `ticket`.
    pub fn on_fade_complete(&mut self, ticket: FadeTicket, backend: &mut dyn RenderBackend) {
        if self.system.is_none() {
            log::debug!("fade {:?} completed after teardown", ticket);
            return;
        }
        self.with_scene(backend, |selection, ctx| selection.fade_completed(ctx, ticket));
    }

    /// Camera-feed opacity behind the model, 0..1. The starfield shows only
    /// while the feed is fully transparent.
    pub fn on_background_opacity(&mut self, value: f32, backend: &mut dyn RenderBackend) {
        if !value.is_finite() {
            log::warn!("ignoring background opacity {}", value);
            return;
        }
        self.background_opacity = value.clamp(0.0, 1.0);
        self.apply_background(backend);
    }

    fn apply_background(&mut self, backend: &mut dyn RenderBackend) {
        backend.set_background_intensity(self.background_opacity);
        if let Some(system) = &self.system {
            let hidden = self.background_opacity > 0.0;
            if let Some(node) = self.graph.get_mut(system.background) {
                node.hidden = hidden;
                backend.set_hidden(system.background, hidden);
            }
        }
    }

    /// Tear everything down and return to the scale prompt.
    pub fn on_reset(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(system) = self.system.take() {
            for center in self.graph.children(NodeId::CAMERA).to_vec() {
                backend.detach_node(center);
            }
            backend.detach_node(system.model_center);
        }
        self.graph.clear();
        self.selection.reset();
        self.scale = self.config.default_scale;
        self.background_opacity = self.config.background_opacity;
        backend.set_background_intensity(self.background_opacity);
        self.events.push(SessionEvent::Reset);
        log::info!("session reset");
    }

    /// Dispatch one queued UI event.
    pub fn handle_input(&mut self, event: InputEvent, hits: &dyn HitTester, backend: &mut dyn RenderBackend) {
        match event {
            InputEvent::Tap { x, y } => self.on_tap(Vec2::new(x, y), hits, backend),
            InputEvent::Back => self.on_back_pressed(backend),
            InputEvent::PausePlay => self.on_pause_play_toggled(backend),
            InputEvent::Reset => self.on_reset(backend),
            InputEvent::ScaleConfirmed { text } => self.on_scale_confirmed(text.as_deref(), backend),
            InputEvent::ToggleLabels => self.on_labels_toggled(backend),
            InputEvent::BackgroundOpacity { value } => self.on_background_opacity(value, backend),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Celestial;
    use crate::input::queue::InputQueue;
    use crate::renderer::headless::HeadlessBackend;
    use crate::renderer::traits::Hit;

    struct Pointing(Option<&'static str>);

    impl HitTester for Pointing {
        fn hit_test(&self, _point: Vec2) -> Option<Hit> {
            self.0.map(|name| Hit { name: name.to_string(), world_transform: Transform::IDENTITY })
        }
    }

    fn settle(session: &mut Session, backend: &mut HeadlessBackend) {
        for _ in 0..200 {
            let done = backend.tick(0.1);
            if done.is_empty() && backend.pending_tweens() == 0 {
                return;
            }
            for ticket in done {
                session.on_fade_complete(ticket, backend);
            }
        }
        panic!("transitions never settled");
    }

    fn started() -> (Session, HeadlessBackend) {
        let mut session = Session::default();
        let mut backend = HeadlessBackend::new();
        session.on_scale_confirmed(None, &mut backend);
        (session, backend)
    }

    #[test]
    fn zoom_into_earth_then_moon() {
        let (mut session, mut backend) = started();
        assert_eq!(session.scale(), 1.0);
        assert_eq!(Catalog::new(session.scale()).top_level().len(), 9);

        session.on_tap(Vec2::ZERO, &Pointing(Some("earth")), &mut backend);
        assert_eq!(session.zoom_level(), ZoomLevel::System);
        let selected = session.selection().selected_system().unwrap();
        assert_eq!(session.node_name(selected), Some("earth system"));
        assert_eq!(session.selection().selected_body(), None);
        settle(&mut session, &mut backend);

        session.on_tap(Vec2::ZERO, &Pointing(Some("moon")), &mut backend);
        assert_eq!(session.zoom_level(), ZoomLevel::SubBody);
        let moon_radius = Catalog::new(1.0).body(Celestial::Moon).radius;
        let d = session.selection().selected_distance().unwrap();
        assert!((d - moon_radius * 3.3).abs() < 1e-6);
        settle(&mut session, &mut backend);

        let events = session.drain_events();
        assert_eq!(events[0], SessionEvent::Built { scale: 1.0 });
        assert!(events.contains(&SessionEvent::Focused { body: Celestial::Moon, level: ZoomLevel::SubBody }));
    }

    #[test]
    fn reset_clears_everything() {
        let (mut session, mut backend) = started();
        session.on_tap(Vec2::ZERO, &Pointing(Some("earth")), &mut backend);
        settle(&mut session, &mut backend);
        session.on_reset(&mut backend);

        assert!(!session.is_built());
        assert_eq!(session.zoom_level(), ZoomLevel::None);
        assert_eq!(session.selection().selected_system(), None);
        assert_eq!(session.selection().selected_sub_body(), None);
        assert_eq!(session.selection().selected_distance(), None);
        assert!(!session.selection().is_zoomed());
        assert_eq!(session.scale(), 1.0);
        assert_eq!(session.graph().len(), 2);
        assert!(backend.is_empty());
    }

    #[test]
    fn reset_mid_transition_ignores_late_completions() {
        let (mut session, mut backend) = started();
        session.on_tap(Vec2::ZERO, &Pointing(Some("mars")), &mut backend);
        session.on_reset(&mut backend);
        settle(&mut session, &mut backend);
        assert_eq!(session.graph().len(), 2);

        session.on_scale_confirmed(Some("2"), &mut backend);
        assert_eq!(session.scale(), 2.0);
        assert_eq!(session.zoom_level(), ZoomLevel::None);
    }

    #[test]
    fn scale_prompt_accepts_decimal_comma() {
        let mut session = Session::default();
        let mut backend = HeadlessBackend::new();
        session.on_scale_confirmed(Some("0,5"), &mut backend);
        assert_eq!(session.scale(), 0.5);
        let sun = session.graph().find_by_name("sun").unwrap();
        assert!(backend.is_attached(sun));
    }

    #[test]
    fn second_confirmation_is_ignored() {
        let (mut session, mut backend) = started();
        let nodes = session.graph().len();
        session.on_scale_confirmed(Some("3"), &mut backend);
        assert_eq!(session.scale(), 1.0);
        assert_eq!(session.graph().len(), nodes);
    }

    #[test]
    fn input_before_build_is_ignored() {
        let mut session = Session::default();
        let mut backend = HeadlessBackend::new();
        session.on_tap(Vec2::ZERO, &Pointing(Some("earth")), &mut backend);
        session.on_back_pressed(&mut backend);
        session.on_pause_play_toggled(&mut backend);
        session.on_fade_complete(FadeTicket(0), &mut backend);
        assert_eq!(session.zoom_level(), ZoomLevel::None);
        assert!(backend.commands().is_empty());
    }

    #[test]
    fn system_is_placed_in_front_of_camera() {
        let mut session = Session::default();
        let mut backend = HeadlessBackend::new();
        session.update_camera(Transform::from_translation(glam::Vec3::new(0.0, 1.0, 0.0)));
        session.on_scale_confirmed(Some("1"), &mut backend);
        let center = session.system().unwrap().model_center;
        let world = session.graph().world_transform(center).unwrap();
        assert!((world.translation - glam::Vec3::new(0.0, 1.0, -1.2)).length() < 1e-5);
    }

    #[test]
    fn background_opacity_hides_starfield() {
        let (mut session, mut backend) = started();
        let background = session.system().unwrap().background;
        assert!(session.graph().get(background).unwrap().hidden);
        assert_eq!(backend.background_intensity(), 0.5);

        session.on_background_opacity(0.0, &mut backend);
        assert!(!session.graph().get(background).unwrap().hidden);
        assert!(!backend.node(background).unwrap().hidden);

        session.on_background_opacity(f32::NAN, &mut backend);
        assert_eq!(session.background_opacity(), 0.0);
    }

    #[test]
    fn queued_input_drives_the_session() {
        let mut session = Session::default();
        let mut backend = HeadlessBackend::new();
        let mut queue = InputQueue::new();
        queue.push(InputEvent::ScaleConfirmed { text: Some("1".into()) });
        queue.push(InputEvent::Tap { x: 0.5, y: 0.5 });
        queue.push(InputEvent::PausePlay);
        for event in queue.drain() {
            session.handle_input(event, &Pointing(Some("sun")), &mut backend);
        }
        assert_eq!(session.zoom_level(), ZoomLevel::Body);
        assert!(!session.selection().body_rotating());

        session.handle_input(InputEvent::Back, &Pointing(None), &mut backend);
        settle(&mut session, &mut backend);
        let sun = session.system().unwrap().sun;
        assert!(backend.is_animating(sun));
        assert_eq!(session.zoom_level(), ZoomLevel::None);
    }

    #[test]
    fn feature_flag_unlocks_outer_planets() {
        let (mut session, mut backend) = started();
        session.on_tap(Vec2::ZERO, &Pointing(Some("saturn")), &mut backend);
        assert_eq!(session.zoom_level(), ZoomLevel::None);
        session.set_feature_unlocked(true);
        session.on_tap(Vec2::ZERO, &Pointing(Some("saturn")), &mut backend);
        assert_eq!(session.zoom_level(), ZoomLevel::System);
    }
}
