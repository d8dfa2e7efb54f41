//! Browser bridge for the planetarium scene core.
//!
//! wasm-bindgen cannot export a stateful struct with borrowed backends, so
//! the runner lives in a `thread_local!` and every export goes through
//! `with_runner`. Call `planetarium_init()` once before anything else.

pub mod runner;

pub use runner::SessionRunner;

use std::cell::RefCell;

use glam::{Quat, Vec3};
use planetarium::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = RefCell::new(None);
}

fn with_runner<R: Default>(f: impl FnOnce(&mut SessionRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("session not initialized, call planetarium_init() first");
            R::default()
        }
    })
}

#[wasm_bindgen]
pub fn planetarium_init(config_json: Option<String>) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SessionRunner::from_json(config_json.as_deref());
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("planetarium: initialized");
}

#[wasm_bindgen]
pub fn planetarium_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Inbound UI ----

#[wasm_bindgen]
pub fn planetarium_confirm_scale(text: Option<String>) {
    with_runner(|r| r.push_input(InputEvent::ScaleConfirmed { text }));
}

/// `hit` is the name of the node under the tap, from the host's raycast.
#[wasm_bindgen]
pub fn planetarium_tap(x: f32, y: f32, hit: Option<String>) {
    with_runner(|r| r.push_tap(x, y, hit));
}

#[wasm_bindgen]
pub fn planetarium_back() {
    with_runner(|r| r.push_input(InputEvent::Back));
}

#[wasm_bindgen]
pub fn planetarium_pause_play() {
    with_runner(|r| r.push_input(InputEvent::PausePlay));
}

#[wasm_bindgen]
pub fn planetarium_toggle_labels() {
    with_runner(|r| r.push_input(InputEvent::ToggleLabels));
}

#[wasm_bindgen]
pub fn planetarium_background_opacity(value: f32) {
    with_runner(|r| r.push_input(InputEvent::BackgroundOpacity { value }));
}

#[wasm_bindgen]
pub fn planetarium_reset() {
    with_runner(|r| r.push_input(InputEvent::Reset));
}

#[wasm_bindgen]
pub fn planetarium_input(json: &str) {
    with_runner(|r| r.push_input_json(json));
}

#[wasm_bindgen]
pub fn planetarium_update_camera(x: f32, y: f32, z: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
    with_runner(|r| r.update_camera(Vec3::new(x, y, z), Quat::from_xyzw(qx, qy, qz, qw)));
}

#[wasm_bindgen]
pub fn planetarium_set_feature_unlocked(unlocked: bool) {
    with_runner(|r| r.set_feature_unlocked(unlocked));
}

// ---- Outbound ----

#[wasm_bindgen]
pub fn planetarium_drain_commands() -> String {
    with_runner(|r| r.drain_commands_json())
}

#[wasm_bindgen]
pub fn planetarium_drain_events() -> String {
    with_runner(|r| r.drain_events_json())
}

#[wasm_bindgen]
pub fn planetarium_zoom_level() -> String {
    with_runner(|r| r.zoom_level_json())
}

#[wasm_bindgen]
pub fn planetarium_body_info(name: &str) -> Option<String> {
    with_runner(|r| r.body_info_json(name))
}
