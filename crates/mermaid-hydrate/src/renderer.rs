//! The diagram library, seen from the initializer
//!
//! [`DiagramRenderer`] is the whole contract: configure once, then render
//! every target element in the document. The browser host wraps the page's
//! global `mermaid` object; [`ScriptEmbedRenderer`] is the build-time
//! stand-in that leaves the actual rendering to the reader's browser.

use crate::config::MermaidConfig;
use crate::dom::{Document, DocumentTree, DomError};

/// Errors raised by a collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not serialize mermaid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Dom(#[from] DomError),

    /// The host library threw
    #[error("diagram library error: {0}")]
    Host(String),
}

/// An external diagram library.
pub trait DiagramRenderer<T: DocumentTree + ?Sized> {
    /// Apply the option set. Called once, before anything else.
    fn initialize(&mut self, config: &MermaidConfig) -> Result<(), RenderError>;

    /// Render every diagram target currently in `tree`.
    fn run(&mut self, tree: &mut T) -> Result<(), RenderError>;
}

impl<T, R> DiagramRenderer<T> for &mut R
where
    T: DocumentTree + ?Sized,
    R: DiagramRenderer<T> + ?Sized,
{
    fn initialize(&mut self, config: &MermaidConfig) -> Result<(), RenderError> {
        (**self).initialize(config)
    }

    fn run(&mut self, tree: &mut T) -> Result<(), RenderError> {
        (**self).run(tree)
    }
}

/// Default location of the mermaid bundle.
pub const DEFAULT_SCRIPT_SRC: &str = "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.min.js";

/// Renders by deferring to the browser: `run` appends the mermaid bundle
/// and an inline bootstrap calling `mermaid.initialize(...)` and
/// `mermaid.run()` to the end of `<body>`.
#[derive(Debug, Clone)]
pub struct ScriptEmbedRenderer {
    script_src: String,
    config: Option<MermaidConfig>,
}

impl Default for ScriptEmbedRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_SCRIPT_SRC)
    }
}

impl ScriptEmbedRenderer {
    pub fn new(script_src: impl Into<String>) -> Self {
        Self {
            script_src: script_src.into(),
            config: None,
        }
    }

    /// Inline bootstrap for the given config.
    pub fn bootstrap(config: &MermaidConfig) -> Result<String, RenderError> {
        Ok(format!(
            "mermaid.initialize({});\nmermaid.run();\n",
            config.to_json()?
        ))
    }
}

impl DiagramRenderer<Document> for ScriptEmbedRenderer {
    fn initialize(&mut self, config: &MermaidConfig) -> Result<(), RenderError> {
        self.config = Some(config.clone());
        Ok(())
    }

    fn run(&mut self, doc: &mut Document) -> Result<(), RenderError> {
        let config = self.config.clone().unwrap_or_default();
        let target = doc.body().unwrap_or_else(|| doc.root());

        let already_loaded = doc.descendants(doc.root()).any(|node| {
            doc.tag_name(node) == Some("script")
                && doc.attr(node, "src") == Some(self.script_src.as_str())
        });

        if already_loaded {
            tracing::debug!(src = %self.script_src, "mermaid bundle already referenced");
        } else {
            let loader = doc.create_element("script");
            doc.set_attr(loader, "src", &self.script_src)?;
            doc.append_child(target, loader);
        }

        let bootstrap = doc.create_element("script");
        doc.set_text_content(bootstrap, &Self::bootstrap(&config)?);
        doc.append_child(target, bootstrap);

        tracing::debug!(theme = %config.theme, "embedded mermaid bootstrap");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{parse_document_str, serialize};

    #[test]
    fn test_bootstrap_script() {
        let script = ScriptEmbedRenderer::bootstrap(&MermaidConfig::default()).unwrap();
        assert_eq!(
            script,
            "mermaid.initialize({\"startOnLoad\":false,\"theme\":\"default\",\"securityLevel\":\"loose\"});\nmermaid.run();\n"
        );
    }

    #[test]
    fn test_run_appends_scripts_to_body() {
        let mut doc = parse_document_str("<html><head></head><body><p>x</p></body></html>").unwrap();
        let mut renderer = ScriptEmbedRenderer::new("/mermaid.js");
        DiagramRenderer::<Document>::initialize(&mut renderer, &MermaidConfig::default()).unwrap();
        renderer.run(&mut doc).unwrap();

        let html = serialize(&doc).unwrap();
        assert!(html.contains(
            "<p>x</p><script src=\"/mermaid.js\"></script><script>mermaid.initialize("
        ));
        assert!(html.ends_with("mermaid.run();\n</script></body></html>"));
    }

    #[test]
    fn test_run_does_not_duplicate_loader() {
        let mut doc = parse_document_str(
            "<html><head><script src=\"/mermaid.js\"></script></head><body></body></html>",
        )
        .unwrap();
        let mut renderer = ScriptEmbedRenderer::new("/mermaid.js");
        renderer.run(&mut doc).unwrap();

        let html = serialize(&doc).unwrap();
        assert_eq!(html.matches("src=\"/mermaid.js\"").count(), 1);
        // run without initialize falls back to the default config
        assert!(html.contains("\"theme\":\"default\""));
    }
}
