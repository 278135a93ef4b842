//! HTML parsing and serialization
//!
//! Parsing goes through html5ever into an rcdom, which is then copied into
//! our arena [`Document`]. Serialization hands the arena to html5ever's own
//! serializer, so escaping, raw-text elements and namespaced attributes
//! follow the same rules the parser used.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, QualName, ns, parse_document, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::dom::{Document, NodeData, NodeId};

/// Errors from the HTML codec.
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("failed to read HTML input: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write HTML: {0}")]
    Write(#[source] io::Error),

    #[error("serialized HTML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Parse a complete HTML document.
///
/// html5ever recovers from any malformed markup, so the only possible error
/// comes from reading the input.
pub fn parse_document_str(html: &str) -> Result<Document, HtmlError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(HtmlError::Read)?;

    let mut doc = Document::new();
    let root = doc.root();
    for child in dom.document.children.borrow().iter() {
        copy_node(child, &mut doc, root);
    }
    Ok(doc)
}

/// Parse an HTML fragment as if it were the content of `<body>`.
///
/// The fragment's top-level nodes become direct children of the document
/// root, with no `html`/`head`/`body` scaffolding.
pub fn parse_fragment_str(html: &str) -> Result<Document, HtmlError> {
    let context = QualName::new(None, ns!(html), "body".into());
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, vec![], false)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(HtmlError::Read)?;

    let mut doc = Document::new();
    let root = doc.root();

    // Fragment parsing wraps everything in a synthetic <html> element
    let top = dom.document.children.borrow();
    let wrapper = top.iter().find(|h| {
        matches!(&h.data, RcNodeData::Element { name, .. } if &*name.local == "html")
    });
    match wrapper {
        Some(html_el) => {
            for child in html_el.children.borrow().iter() {
                copy_node(child, &mut doc, root);
            }
        }
        None => {
            for child in top.iter() {
                copy_node(child, &mut doc, root);
            }
        }
    }
    Ok(doc)
}

/// Copy an rcdom subtree under `parent`.
fn copy_node(handle: &Handle, doc: &mut Document, parent: NodeId) {
    let id = match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                copy_node(child, doc, parent);
            }
            return;
        }
        RcNodeData::Doctype { name, .. } => doc.create_doctype(name.to_string()),
        RcNodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.clone(), attr.value.to_string()))
                .collect();
            let id = doc.create_qualified_element(name.clone(), attrs);
            doc.append_child(parent, id);

            // <template> keeps its content in a separate fragment
            if let Some(contents) = template_contents.borrow().as_ref() {
                for child in contents.children.borrow().iter() {
                    copy_node(child, doc, id);
                }
            }
            for child in handle.children.borrow().iter() {
                copy_node(child, doc, id);
            }
            return;
        }
        RcNodeData::Text { contents } => doc.create_text(contents.borrow().to_string()),
        RcNodeData::Comment { contents } => doc.create_comment(contents.to_string()),
        RcNodeData::ProcessingInstruction { .. } => return,
    };
    doc.append_child(parent, id);
}

/// Serialize the whole document back to HTML.
pub fn serialize(doc: &Document) -> Result<String, HtmlError> {
    render(doc, doc.root(), TraversalScope::ChildrenOnly(None))
}

/// Serialize a single node (and its subtree).
pub fn serialize_node(doc: &Document, node: NodeId) -> Result<String, HtmlError> {
    render(doc, node, TraversalScope::IncludeNode)
}

fn render(doc: &Document, node: NodeId, scope: TraversalScope) -> Result<String, HtmlError> {
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..SerializeOpts::default()
    };
    let mut out = Vec::new();
    html5ever::serialize(&mut out, &SerializableNode { doc, node }, opts)
        .map_err(HtmlError::Write)?;
    Ok(String::from_utf8(out)?)
}

/// A node of a [`Document`], as html5ever's serializer sees it.
struct SerializableNode<'a> {
    doc: &'a Document,
    node: NodeId,
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        match traversal_scope {
            TraversalScope::IncludeNode => write_node(self.doc, self.node, serializer),
            TraversalScope::ChildrenOnly(_) => self
                .doc
                .children(self.node)
                .iter()
                .try_for_each(|&child| write_node(self.doc, child, serializer)),
        }
    }
}

fn write_node<S: Serializer>(doc: &Document, node: NodeId, serializer: &mut S) -> io::Result<()> {
    match doc.data(node) {
        NodeData::Document => doc
            .children(node)
            .iter()
            .try_for_each(|&child| write_node(doc, child, serializer)),
        NodeData::Doctype { name } => serializer.write_doctype(name),
        NodeData::Text(text) => serializer.write_text(text),
        NodeData::Comment(text) => serializer.write_comment(text),
        NodeData::Element { name, attrs } => {
            serializer.start_elem(name.clone(), attrs.iter().map(|(k, v)| (k, v.as_str())))?;

            // the parser drops a newline right after these start tags, so a
            // text that starts with one needs a second to survive
            if drops_leading_newline(name)
                && let Some(&first) = doc.children(node).first()
                && let NodeData::Text(text) = doc.data(first)
                && text.starts_with('\n')
            {
                serializer.write_text("\n")?;
            }

            for &child in doc.children(node) {
                write_node(doc, child, serializer)?;
            }
            serializer.end_elem(name.clone())
        }
    }
}

fn drops_leading_newline(name: &QualName) -> bool {
    name.ns == ns!(html) && matches!(&*name.local, "pre" | "textarea" | "listing")
}
