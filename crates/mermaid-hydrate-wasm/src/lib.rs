//! mermaid-hydrate in the browser
//!
//! Load this module next to the mermaid bundle. Once the DOM is ready it
//! turns every `code.language-mermaid` block on the page into a
//! `div.mermaid` target and asks the page's global `mermaid` to render
//! them.
//!
//! This crate is WASM-only.

#![cfg(target_arch = "wasm32")]

use mermaid_hydrate::{HydrateReport, Initializer};
use wasm_bindgen::prelude::*;

mod dom;
mod global;

pub use dom::BrowserDocument;
pub use global::GlobalMermaid;

#[wasm_bindgen(start)]
pub fn start() {
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::DEBUG)
            .build(),
    );
    tracing::info!("mermaid init script loaded");

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        tracing::error!("no document to hydrate");
        return;
    };

    if document.ready_state() != "loading" {
        hydrate_document(document);
        return;
    }

    let handler_doc = document.clone();
    let on_ready = Closure::once(Box::new(move || {
        hydrate_document(handler_doc);
    }) as Box<dyn FnOnce()>);
    if let Err(e) = document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
    {
        tracing::error!("failed to register DOMContentLoaded handler: {e:?}");
        return;
    }
    on_ready.forget();
}

/// Run a pass over the current page by hand (e.g. after client-side
/// navigation inserted new blocks). Returns how many diagrams were
/// converted.
#[wasm_bindgen(js_name = hydratePage)]
pub fn hydrate_page() -> usize {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(hydrate_document)
        .map_or(0, |report| report.replaced.len())
}

fn hydrate_document(document: web_sys::Document) -> Option<HydrateReport> {
    tracing::info!("document ready, looking for mermaid");
    let mut tree = BrowserDocument::new(document);
    let mut init = Initializer::new(GlobalMermaid::detect());
    init.on_document_ready(&mut tree)
}
