//! The page's global `mermaid` object as a [`DiagramRenderer`]

use js_sys::{Function, Object, Promise, Reflect};
use mermaid_hydrate::{DiagramRenderer, MermaidConfig, RenderError};
use wasm_bindgen::prelude::*;

use crate::dom::{BrowserDocument, describe};

/// `window.mermaid`, when the bundle has been loaded.
#[derive(Debug, Clone)]
pub struct GlobalMermaid {
    mermaid: Object,
}

impl GlobalMermaid {
    /// Look up `window.mermaid`. `None` when it is undefined.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let value = Reflect::get(&window, &JsValue::from_str("mermaid")).ok()?;
        if value.is_undefined() {
            return None;
        }
        // a defined but unusable value (null included) is still present;
        // the first method lookup reports it
        Some(Self {
            mermaid: value.unchecked_into::<Object>(),
        })
    }

    fn method(&self, name: &str) -> Result<Function, RenderError> {
        Reflect::get(&self.mermaid, &JsValue::from_str(name))
            .map_err(host_error)?
            .dyn_into::<Function>()
            .map_err(|_| RenderError::Host(format!("mermaid.{name} is not a function")))
    }
}

/// `{ startOnLoad, theme, securityLevel }` as a plain JS object.
fn config_object(config: &MermaidConfig) -> Result<Object, RenderError> {
    let object = Object::new();
    let entries = [
        ("startOnLoad", JsValue::from_bool(config.start_on_load)),
        ("theme", JsValue::from_str(config.theme.as_str())),
        ("securityLevel", JsValue::from_str(config.security_level.as_str())),
    ];
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), &value).map_err(host_error)?;
    }
    Ok(object)
}

fn host_error(value: JsValue) -> RenderError {
    RenderError::Host(describe(&value))
}

impl DiagramRenderer<BrowserDocument> for GlobalMermaid {
    fn initialize(&mut self, config: &MermaidConfig) -> Result<(), RenderError> {
        let options = config_object(config)?;
        self.method("initialize")?
            .call1(&self.mermaid, &options)
            .map_err(host_error)?;
        Ok(())
    }

    fn run(&mut self, _tree: &mut BrowserDocument) -> Result<(), RenderError> {
        let result = self
            .method("run")?
            .call0(&self.mermaid)
            .map_err(host_error)?;

        // mermaid >= 10 renders asynchronously; surface parse errors in the log
        if let Ok(promise) = result.dyn_into::<Promise>() {
            let on_error = Closure::new(|e: JsValue| {
                tracing::error!("mermaid failed to render: {}", describe(&e));
            });
            let _ = promise.catch(&on_error);
            on_error.forget();
        }
        Ok(())
    }
}
