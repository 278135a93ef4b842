//! Batch processing of HTML files
//!
//! Every file gets its own [`Document`] and its own initialization pass.
//! Files without mermaid blocks are left alone on disk.

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result, WrapErr, eyre};
use mermaid_hydrate::{
    DiagramRenderer, Document, HydrateReport, Initializer, MermaidConfig, RenderError,
    ScriptEmbedRenderer, html,
};

use crate::config::ResolvedConfig;

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub files_failed: usize,
    pub diagrams: usize,
}

/// The collaborator used at build time.
enum BuildRenderer {
    /// Reference the mermaid bundle and bootstrap it from the page
    Embed(ScriptEmbedRenderer),
    /// The page loads mermaid itself; only the markup changes
    MarkupOnly,
}

impl DiagramRenderer<Document> for BuildRenderer {
    fn initialize(&mut self, config: &MermaidConfig) -> Result<(), RenderError> {
        match self {
            BuildRenderer::Embed(renderer) => {
                DiagramRenderer::<Document>::initialize(renderer, config)
            }
            BuildRenderer::MarkupOnly => Ok(()),
        }
    }

    fn run(&mut self, doc: &mut Document) -> Result<(), RenderError> {
        match self {
            BuildRenderer::Embed(renderer) => renderer.run(doc),
            BuildRenderer::MarkupOnly => {
                tracing::debug!("markup only, not embedding mermaid");
                Ok(())
            }
        }
    }
}

/// Rewrite one HTML string. Returns `None` when there was nothing to do.
pub fn process_html(
    html: &str,
    config: &ResolvedConfig,
) -> Result<Option<(String, HydrateReport)>> {
    let mut doc = html::parse_document_str(html)?;

    let renderer = if config.markup_only {
        BuildRenderer::MarkupOnly
    } else {
        BuildRenderer::Embed(ScriptEmbedRenderer::new(&config.script_src))
    };

    let mut init = Initializer::new(Some(renderer))
        .with_config(config.mermaid.clone())
        .with_options(config.options.clone());
    let report = init.try_run(&mut doc)?;

    if !report.changed() {
        return Ok(None);
    }
    Ok(Some((html::serialize(&doc)?, report)))
}

/// Process every HTML file under `config.input`.
///
/// With `check` set nothing is written; the summary still counts the files
/// that would change.
pub fn run(config: &ResolvedConfig, check: bool) -> Result<Summary> {
    let files = collect_html_files(&config.input)?;
    let mut summary = Summary::default();

    for file in &files {
        summary.files_scanned += 1;

        match process_file(file, config, check) {
            Ok(Some(report)) => {
                summary.files_changed += 1;
                summary.diagrams += report.replaced.len();
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("{file}: {e:#}");
                summary.files_failed += 1;
            }
        }
    }

    Ok(summary)
}

fn process_file(
    file: &Utf8Path,
    config: &ResolvedConfig,
    check: bool,
) -> Result<Option<HydrateReport>> {
    let html = fs_err::read_to_string(file)?;
    let Some((rewritten, report)) =
        process_html(&html, config).wrap_err_with(|| format!("failed to process {file}"))?
    else {
        tracing::trace!("{file}: no mermaid blocks");
        return Ok(None);
    };

    if check {
        tracing::info!("{file}: {} diagram(s) would be converted", report.replaced.len());
        return Ok(Some(report));
    }

    let target = output_path(file, config)?;
    if let Some(parent) = target.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(&target, rewritten)?;
    tracing::info!("{target}: converted {} diagram(s)", report.replaced.len());

    Ok(Some(report))
}

/// Where the result for `file` goes.
fn output_path(file: &Utf8Path, config: &ResolvedConfig) -> Result<Utf8PathBuf> {
    let Some(output) = &config.output else {
        return Ok(file.to_owned());
    };

    if config.input.is_file() {
        let name = file
            .file_name()
            .ok_or_else(|| eyre!("{file} has no file name"))?;
        return Ok(output.join(name));
    }

    let relative = file
        .strip_prefix(&config.input)
        .wrap_err_with(|| format!("{file} is outside {}", config.input))?;
    Ok(output.join(relative))
}

/// Find `.html`/`.htm` files. A file input is returned as is.
pub fn collect_html_files(input: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_owned()]);
    }
    if !input.is_dir() {
        return Err(eyre!("input {input} does not exist"));
    }

    let mut files = Vec::new();
    for entry in ignore::WalkBuilder::new(input).build() {
        let entry = entry?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let Some(path) = Utf8Path::from_path(entry.path()) else {
            tracing::warn!("skipping non-UTF-8 path {}", entry.path().display());
            continue;
        };
        if matches!(path.extension(), Some("html" | "htm")) {
            files.push(path.to_owned());
        }
    }
    files.sort();
    Ok(files)
}
