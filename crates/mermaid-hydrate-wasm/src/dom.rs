//! The live page as a [`DocumentTree`]

use mermaid_hydrate::{DocumentTree, DomError, Selector};
use wasm_bindgen::{JsCast, JsValue};

/// Wraps the page's `document`.
#[derive(Debug, Clone)]
pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl DocumentTree for BrowserDocument {
    type Node = web_sys::Node;

    fn query_selector_all(&self, selector: &Selector) -> Result<Vec<web_sys::Node>, DomError> {
        // NodeList from querySelectorAll is static
        let list = self
            .document
            .query_selector_all(&selector.to_string())
            .map_err(host_error)?;
        Ok((0..list.length()).filter_map(|i| list.item(i)).collect())
    }

    fn create_element(&mut self, tag: &str) -> Result<web_sys::Node, DomError> {
        let element = self.document.create_element(tag).map_err(host_error)?;
        Ok(element.into())
    }

    fn set_attribute(
        &mut self,
        node: &web_sys::Node,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        let element = node
            .dyn_ref::<web_sys::Element>()
            .ok_or(DomError::NotAnElement)?;
        element.set_attribute(name, value).map_err(host_error)
    }

    fn text_content(&self, node: &web_sys::Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text_content(&mut self, node: &web_sys::Node, text: &str) -> Result<(), DomError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn parent(&self, node: &web_sys::Node) -> Option<web_sys::Node> {
        node.parent_node()
    }

    fn replace_child(
        &mut self,
        parent: &web_sys::Node,
        new: &web_sys::Node,
        old: &web_sys::Node,
    ) -> Result<(), DomError> {
        if new.parent_node().is_some() {
            return Err(DomError::AlreadyAttached);
        }
        if old.parent_node().as_ref() != Some(parent) {
            return Err(DomError::NotAChild);
        }
        parent.replace_child(new, old).map_err(host_error)?;
        Ok(())
    }
}

/// Best-effort message for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn host_error(value: JsValue) -> DomError {
    DomError::Host(describe(&value))
}
