//! Browser bindings: the 2D template editor and the 3D mug preview.

use wasm_bindgen::prelude::*;

mod download;
mod editor;
mod logger;
mod ports;
mod utils;
mod viewer;

pub use editor::Editor;
pub use ports::{DomPorts, DomTargets};
pub use viewer::{RafScheduler, Viewer};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    logger::init(log::LevelFilter::Info);
    log::info!("mug-wasm {} ready", env!("CARGO_PKG_VERSION"));
    Ok(())
}

/// Raises or lowers console logging: `error`, `warn`, `info`, `debug` or
/// `trace`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level: log::LevelFilter = level.parse().map_err(utils::js_error)?;
    logger::init(level);
    Ok(())
}
