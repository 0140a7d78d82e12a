//! Platform abstraction layer
//!
//! Handles browser/native differences for logging setup. Persistence
//! backends live in `persistence`.

/// Install the logger for the current platform
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    // RUST_LOG overrides the default level
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point: set up logging as soon as the module loads
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    init_logging();
    log::info!("flap-sim loaded");
}
