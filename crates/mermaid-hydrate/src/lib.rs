//! # mermaid-hydrate
//!
//! Turns mermaid code blocks into diagram targets.
//!
//! Markdown renderers emit diagram source as
//! `<pre><code class="language-mermaid">...</code></pre>`, but mermaid looks
//! for `<div class="mermaid">`. The [`Initializer`] bridges the two: it finds
//! every marked block, swaps its wrapper for a `div.mermaid` carrying the
//! same text and a sequential id (`mermaid-0`, `mermaid-1`, ...), then asks
//! the diagram library to render them all.
//!
//! The pass runs against any [`DocumentTree`] and any [`DiagramRenderer`]:
//! - in the browser, over the live page and the global `mermaid` object
//!   (see the `mermaid-hydrate-wasm` crate)
//! - at build time, over a [`Document`] parsed from HTML, with
//!   [`ScriptEmbedRenderer`] embedding the client-side bootstrap
//!
//! ## Example
//!
//! ```
//! use mermaid_hydrate::{Initializer, ScriptEmbedRenderer, html};
//!
//! let mut doc = html::parse_document_str(
//!     "<body><pre><code class=\"language-mermaid\">graph TD; A--&gt;B</code></pre></body>",
//! )
//! .unwrap();
//!
//! let mut init = Initializer::new(Some(ScriptEmbedRenderer::default()));
//! let report = init.on_document_ready(&mut doc).unwrap();
//! assert_eq!(report.replaced, vec!["mermaid-0"]);
//!
//! let out = html::serialize(&doc).unwrap();
//! assert!(out.contains("<div class=\"mermaid\" id=\"mermaid-0\">graph TD; A--&gt;B</div>"));
//! ```

pub mod config;
pub mod dom;
pub mod html;
mod hydrate;
mod renderer;
pub mod selector;

pub use config::{HydrateOptions, MermaidConfig, SecurityLevel, Theme};
pub use dom::{Document, DocumentTree, DomError, NodeData, NodeId};
pub use html::HtmlError;
pub use hydrate::{HydrateError, HydrateReport, Initializer, hydrate};
pub use renderer::{DEFAULT_SCRIPT_SRC, DiagramRenderer, RenderError, ScriptEmbedRenderer};
pub use selector::{Selector, SelectorError};
