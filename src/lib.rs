//! Shinchan Stage core crate.
//!
//! A single-page novelty: Shinchan sits in a pink play area, dodges the cursor,
//! laughs when clicked and quotes himself, while clouds drift across the sky.
//! The page is built by [`start_stage`] and removed again by [`stop_stage`].
//!
//! The cloud spawner and the dodge positioner are plain Rust (see
//! [`stage::clouds`] and [`stage::dodge`]) and are tested natively; only the
//! `stage` entry points touch the DOM.

use wasm_bindgen::prelude::*;

#[macro_use]
mod log;

pub mod config;
pub mod stage;

pub use config::StageConfig;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Quotes shown in the speech bubble. The first entry is shown on load.
// -----------------------------------------------------------------------------

pub const QUOTES: &[&str] = &[
    "Ab me itna bhi kuch khaas nahi 😏",
    "Mera naam Shinchan Nohara hai 😇",
    "Buri Buri 😜",
    "Kya aapko shimla mirch pasand hai? 🤕",
    "kazama mere dost! 😙",
];

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Mount the stage with the built-in defaults. Restarts it if already running.
#[wasm_bindgen]
pub fn start_stage() -> Result<(), JsValue> {
    stage::start(StageConfig::default())
}

/// Mount the stage with a JSON override of [`StageConfig`].
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_stage_with_config(json: &str) -> Result<(), JsValue> {
    let cfg = StageConfig::from_json(json)
        .map_err(|e| JsValue::from_str(&format!("invalid stage config: {e}")))?;
    stage::start(cfg)
}

/// Tear everything down: timers, animation frame, listeners, audio, markup.
/// Safe to call when nothing is running.
#[wasm_bindgen]
pub fn stop_stage() {
    stage::stop();
}

#[wasm_bindgen]
pub fn stage_running() -> bool {
    stage::running()
}
