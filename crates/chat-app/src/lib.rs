//! Gemini Chat WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the browser adapters and controllers and hands them to the
//! egui UI.

mod app;
pub mod seed;

#[cfg(test)]
mod tests;

use chat_types::{ChatError, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const CANVAS_ID: &str = "chat_canvas";

/// WASM entry point, called from index.html
#[wasm_bindgen(start)]
pub async fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Gemini Chat starting...");

    let canvas = match find_canvas(CANVAS_ID) {
        Ok(canvas) => canvas,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };
    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(app::ChatApp::new(cc)))),
            )
            .await;
        if let Err(e) = started {
            log::error!("Failed to start eframe: {:?}", e);
        }
    });
}

fn find_canvas(id: &str) -> Result<web_sys::HtmlCanvasElement> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ChatError::JsInterop("No document".to_string()))?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| ChatError::JsInterop(format!("No canvas element with id '{}'", id)))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| ChatError::JsInterop(format!("Element '{}' is not a canvas", id)))
}
