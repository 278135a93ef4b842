//! The initialization pass
//!
//! Turns every marked code block into a diagram target and asks the diagram
//! library to render them:
//!
//! 1. bail out if the library isn't there
//! 2. configure it
//! 3. find the marked blocks, in document order
//! 4. for each, build a container holding the block's text and put it where
//!    the block's *parent* was (the `<pre>` around `<code>` goes too)
//! 5. if anything was found, render everything in one call

use crate::config::{HydrateOptions, MermaidConfig};
use crate::dom::{DocumentTree, DomError};
use crate::renderer::{DiagramRenderer, RenderError};
use crate::selector::{Selector, SelectorError};

/// Why a pass stopped early.
#[derive(Debug, thiserror::Error)]
pub enum HydrateError {
    /// No diagram library in this environment
    #[error("mermaid is not loaded")]
    MissingCollaborator,

    #[error("invalid block selector: {0}")]
    Selector(#[from] SelectorError),

    /// A matched block has no parent or grandparent to swap
    #[error("mermaid block {index} is not wrapped in an attached element")]
    Detached { index: usize },

    #[error("failed to replace mermaid block {index}: {source}")]
    Dom { index: usize, source: DomError },

    #[error("tree query failed: {0}")]
    Query(DomError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What a pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrateReport {
    /// Number of marked blocks found
    pub blocks_found: usize,
    /// Ids of the containers that were inserted, in order
    pub replaced: Vec<String>,
    /// Whether the render-all entry point was invoked
    pub rendered: bool,
}

impl HydrateReport {
    /// Whether the tree was mutated.
    pub fn changed(&self) -> bool {
        !self.replaced.is_empty()
    }
}

/// Run one initialization pass over `tree`.
///
/// `collaborator` is `None` when the diagram library is absent; the tree is
/// then left untouched. Replacements made before an error stay in place.
pub fn hydrate<T, R>(
    tree: &mut T,
    collaborator: Option<&mut R>,
    config: &MermaidConfig,
    options: &HydrateOptions,
) -> Result<HydrateReport, HydrateError>
where
    T: DocumentTree + ?Sized,
    R: DiagramRenderer<T> + ?Sized,
{
    let Some(renderer) = collaborator else {
        return Err(HydrateError::MissingCollaborator);
    };
    tracing::debug!("mermaid found, initializing");

    let selector = Selector::parse(&options.selector)?;
    renderer.initialize(config)?;

    let blocks = tree
        .query_selector_all(&selector)
        .map_err(HydrateError::Query)?;
    tracing::info!(count = blocks.len(), selector = %selector, "found mermaid code blocks");

    let mut report = HydrateReport {
        blocks_found: blocks.len(),
        ..Default::default()
    };

    for (index, block) in blocks.iter().enumerate() {
        tracing::debug!(index, "processing mermaid block");
        let id = replace_block(tree, block, index, options)?;
        report.replaced.push(id);
    }

    if !blocks.is_empty() {
        tracing::info!("rendering mermaid diagrams");
        renderer.run(tree)?;
        report.rendered = true;
    }

    Ok(report)
}

/// Build the container for one block and swap it in for the block's parent.
fn replace_block<T>(
    tree: &mut T,
    block: &T::Node,
    index: usize,
    options: &HydrateOptions,
) -> Result<String, HydrateError>
where
    T: DocumentTree + ?Sized,
{
    let dom_err = |source| HydrateError::Dom { index, source };

    let wrapper = tree
        .parent(block)
        .ok_or(HydrateError::Detached { index })?;
    let grandparent = tree
        .parent(&wrapper)
        .ok_or(HydrateError::Detached { index })?;

    let id = options.id_for(index);
    let container = tree.create_element(&options.container_tag).map_err(dom_err)?;
    tree.set_attribute(&container, "class", &options.class_name)
        .map_err(dom_err)?;
    let source = tree.text_content(block);
    tree.set_text_content(&container, &source).map_err(dom_err)?;
    tree.set_attribute(&container, "id", &id).map_err(dom_err)?;

    tree.replace_child(&grandparent, &container, &wrapper)
        .map_err(dom_err)?;
    Ok(id)
}

/// The document-ready handler.
///
/// Owns the (optional) collaborator and the option sets; each call to
/// [`Initializer::on_document_ready`] is one pass. Failures are logged and
/// swallowed: there is nobody upstream to handle them.
#[derive(Debug, Clone)]
pub struct Initializer<R> {
    collaborator: Option<R>,
    config: MermaidConfig,
    options: HydrateOptions,
}

impl<R> Initializer<R> {
    /// An initializer with the stock option set.
    pub fn new(collaborator: Option<R>) -> Self {
        Self {
            collaborator,
            config: MermaidConfig::default(),
            options: HydrateOptions::default(),
        }
    }

    pub fn with_config(mut self, config: MermaidConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_options(mut self, options: HydrateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn collaborator(&self) -> Option<&R> {
        self.collaborator.as_ref()
    }

    /// Run a pass. Returns the report, or `None` if the pass aborted.
    pub fn on_document_ready<T>(&mut self, tree: &mut T) -> Option<HydrateReport>
    where
        T: DocumentTree + ?Sized,
        R: DiagramRenderer<T>,
    {
        match self.try_run(tree) {
            Ok(report) => Some(report),
            Err(HydrateError::MissingCollaborator) => {
                tracing::error!("mermaid is not loaded");
                None
            }
            Err(e) => {
                tracing::error!("mermaid initialization failed: {e}");
                None
            }
        }
    }

    /// Run a pass and hand back the error instead of logging it.
    pub fn try_run<T>(&mut self, tree: &mut T) -> Result<HydrateReport, HydrateError>
    where
        T: DocumentTree + ?Sized,
        R: DiagramRenderer<T>,
    {
        hydrate(tree, self.collaborator.as_mut(), &self.config, &self.options)
    }
}
