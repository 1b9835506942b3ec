//! WASM bindings for Mumford–Shah level-set segmentation.
//!
//! Images cross the boundary as nested row arrays (`number[][]`); parameters
//! and results use the camelCase shapes of [`Params`] and [`SegmentationOutput`].

use log::{error, info};
use mumseg_core::{from_rows, Params, SegmentationOutput, Segmenter};
use tsify::declare;
use wasm_bindgen::prelude::*;
use wasm_bindgen_console_logger::DEFAULT_LOGGER;
use web_sys::console;

/// Grayscale image as nested rows, `image[row][col]`.
#[declare]
pub type Image = Vec<Vec<f64>>;

/// Initializes the logging system for WASM.
///
/// Sets up console logging and panic hooks for better error reporting in the browser.
/// Should be called once at application startup.
#[wasm_bindgen]
pub fn init_logs() {
    match log::set_logger(&DEFAULT_LOGGER) {
        Ok(_) => info!("Initialized console.logger"),
        Err(e) => error!("failed to set console.logger: {}", e),
    };
    console_error_panic_hook::set_once();
}

/// Updates the log level filter.
///
/// # Arguments
/// * `level` - Log level string: "error", "warn", "info", "debug", "trace", or "off".
///   Defaults to "info" if empty or null.
#[wasm_bindgen]
pub fn update_log_level(level: JsValue) -> Result<(), JsError> {
    let level: Option<String> = serde_wasm_bindgen::from_value(level)?;
    log::set_max_level(mumseg_core::parse_log_level(level.as_deref()));
    Ok(())
}

/// Default [`Params`], for pre-filling UI controls.
#[wasm_bindgen]
pub fn default_params() -> Result<JsValue, JsError> {
    Ok(serde_wasm_bindgen::to_value(&Params::default())?)
}

/// Segments an image.
///
/// # Arguments
/// * `image` - Nested rows of intensities; every row must have the same length.
/// * `params` - Partial [`Params`]; missing fields take their defaults.
///
/// # Returns
/// A [`SegmentationOutput`] with the final `w`, `phi`, foreground, frontier and traces.
///
/// # Errors
/// Ragged or empty images, invalid parameters, or an unknown mode.
#[wasm_bindgen]
pub fn segment(image: JsValue, params: JsValue) -> Result<JsValue, JsError> {
    let rows: Image = serde_wasm_bindgen::from_value(image)?;
    let params: Params = if params.is_undefined() || params.is_null() {
        Params::default()
    } else {
        serde_wasm_bindgen::from_value(params)?
    };
    let u = from_rows(&rows)?;
    let segmenter = Segmenter::new(params)?;

    let label = format!("segment {}x{}", u.nrows(), u.ncols());
    console::time_with_label(&label);
    let seg = segmenter.segment(&u);
    console::time_end_with_label(&label);

    let output = SegmentationOutput::from(&seg?);
    Ok(serde_wasm_bindgen::to_value(&output)?)
}
