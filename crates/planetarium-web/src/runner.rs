use std::collections::VecDeque;

use glam::{Quat, Vec2, Vec3};
use planetarium::{
    Celestial, HeadlessBackend, Hit, HitTester, InputEvent, InputQueue, Session, SessionConfig, Transform,
};
use serde_json::json;

/// Result of the host's own raycast for one queued tap.
struct HostHit(Option<String>);

impl HitTester for HostHit {
    fn hit_test(&self, _point: Vec2) -> Option<Hit> {
        self.0.clone().map(|name| Hit { name, world_transform: Transform::IDENTITY })
    }
}

/// Wires a `Session` to the headless backend for a browser host.
///
/// The host raycasts against its own copy of the scene and passes the hit
/// node name with each tap. Render commands and session events go back out
/// as JSON, drained once per frame.
pub struct SessionRunner {
    session: Session,
    backend: HeadlessBackend,
    input: InputQueue,
    /// Hit names for queued taps, in queue order.
    tap_hits: VecDeque<Option<String>>,
}

impl SessionRunner {
    pub fn new(config: SessionConfig) -> Self {
        let backend = HeadlessBackend::new().with_easing(config.fade_easing, config.move_easing);
        Self {
            session: Session::new(config),
            backend,
            input: InputQueue::new(),
            tap_hits: VecDeque::new(),
        }
    }

    /// Build from host-supplied JSON, falling back to defaults.
    pub fn from_json(config: Option<&str>) -> Self {
        let config = match config.map(SessionConfig::from_json) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("invalid session config, using defaults: {}", e);
                SessionConfig::default()
            }
            None => SessionConfig::default(),
        };
        Self::new(config)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn push_tap(&mut self, x: f32, y: f32, hit: Option<String>) {
        self.tap_hits.push_back(hit);
        self.input.push(InputEvent::Tap { x, y });
    }

    /// Parse one JSON-encoded `InputEvent`. Taps arriving this way carry no hit.
    pub fn push_input_json(&mut self, json: &str) {
        match serde_json::from_str::<InputEvent>(json) {
            Ok(InputEvent::Tap { x, y }) => self.push_tap(x, y, None),
            Ok(event) => self.push_input(event),
            Err(e) => log::warn!("ignoring malformed input {}: {}", json, e),
        }
    }

    pub fn update_camera(&mut self, translation: Vec3, rotation: Quat) {
        self.session
            .update_camera(Transform::from_translation(translation).with_rotation(rotation.normalize()));
    }

    pub fn set_feature_unlocked(&mut self, unlocked: bool) {
        self.session.set_feature_unlocked(unlocked);
    }

    /// Dispatch queued input, then advance fades and feed completions back.
    pub fn tick(&mut self, dt: f32) {
        for event in self.input.drain() {
            let hits = match event {
                InputEvent::Tap { .. } => HostHit(self.tap_hits.pop_front().flatten()),
                _ => HostHit(None),
            };
            self.session.handle_input(event, &hits, &mut self.backend);
        }
        for ticket in self.backend.tick(dt) {
            self.session.on_fade_complete(ticket, &mut self.backend);
        }
    }

    pub fn drain_commands_json(&mut self) -> String {
        let commands = self.backend.drain_commands();
        serde_json::to_string(&commands).unwrap_or_else(|e| {
            log::error!("failed to encode render commands: {}", e);
            "[]".to_string()
        })
    }

    pub fn drain_events_json(&mut self) -> String {
        let events = self.session.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("failed to encode session events: {}", e);
            "[]".to_string()
        })
    }

    pub fn zoom_level_json(&self) -> String {
        json!(self.session.zoom_level()).to_string()
    }

    /// Info panel content for a body name.
    pub fn body_info_json(&self, name: &str) -> Option<String> {
        let celestial = Celestial::from_name(name)?;
        let satellites: Vec<&str> = celestial.satellites().iter().map(|c| c.name()).collect();
        Some(
            json!({
                "name": celestial.name(),
                "kind": celestial.kind(),
                "info": celestial.info(),
                "satellites": satellites,
            })
            .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetarium::ZoomLevel;

    fn run(runner: &mut SessionRunner) {
        for _ in 0..100 {
            runner.tick(0.1);
        }
    }

    #[test]
    fn scale_then_tap_enters_system() {
        let mut runner = SessionRunner::from_json(None);
        runner.push_input_json(r#"{"type":"scale_confirmed","text":"1"}"#);
        runner.tick(0.0);
        assert!(runner.session().is_built());

        runner.push_tap(0.5, 0.5, Some("earth".into()));
        run(&mut runner);
        assert_eq!(runner.session().zoom_level(), ZoomLevel::System);
        assert!(runner.drain_events_json().contains("focused"));
        assert!(runner.drain_commands_json().starts_with('['));
    }

    #[test]
    fn tap_without_hit_does_nothing() {
        let mut runner = SessionRunner::from_json(Some("{}"));
        runner.push_input(InputEvent::ScaleConfirmed { text: None });
        runner.push_tap(0.1, 0.1, None);
        run(&mut runner);
        assert_eq!(runner.session().zoom_level(), ZoomLevel::None);
    }

    #[test]
    fn bad_config_falls_back() {
        let runner = SessionRunner::from_json(Some("not json"));
        assert_eq!(runner.session().config().fade_duration, 0.5);
    }

    #[test]
    fn body_info_lists_satellites() {
        let runner = SessionRunner::from_json(None);
        let info = runner.body_info_json("jupiter").unwrap();
        assert!(info.contains("ganymede"));
        assert!(runner.body_info_json("pluto").is_none());
    }
}
