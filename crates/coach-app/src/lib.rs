//! Coach App — WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the platform adapters, hands them to the coordinator and
//! exposes commands plus a JSON state snapshot to the rendering shell.

mod app;

use wasm_bindgen::prelude::*;

pub use app::CoachApp;

/// WASM entry point — runs once when the module is instantiated
#[wasm_bindgen(start)]
pub fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Coach WASM starting...");
}
