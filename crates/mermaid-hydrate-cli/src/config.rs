//! Configuration file discovery and parsing
//!
//! Searches for `.config/mermaid-hydrate.yaml` walking up from the current
//! directory. The project root is the parent of `.config/`; relative paths
//! in the file are resolved against it. Command-line flags win over the
//! file, and are resolved against the current directory.

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result, eyre};
use mermaid_hydrate::{DEFAULT_SCRIPT_SRC, HydrateOptions, MermaidConfig};
use serde::Deserialize;

use crate::args::Args;

const CONFIG_DIR: &str = ".config";
const CONFIG_FILE: &str = "mermaid-hydrate.yaml";

/// Contents of `.config/mermaid-hydrate.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// HTML file or directory to process (relative to project root)
    pub input: Option<String>,

    /// Where to write results; in place when absent
    pub output: Option<String>,

    /// URL of the mermaid bundle to reference from processed pages
    pub script_src: Option<String>,

    /// Skip embedding the mermaid bundle and bootstrap (the site template
    /// already loads mermaid)
    #[serde(default)]
    pub markup_only: bool,

    /// Options passed to `mermaid.initialize`
    #[serde(default)]
    pub mermaid: MermaidConfig,

    /// Which blocks to convert and what to build in their place
    #[serde(default)]
    pub blocks: HydrateOptions,
}

/// Configuration with every path resolved
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// File or directory to process
    pub input: Utf8PathBuf,
    /// Output directory; `None` rewrites files in place
    pub output: Option<Utf8PathBuf>,
    /// Mermaid bundle URL
    pub script_src: String,
    /// Don't embed scripts, only rewrite markup
    pub markup_only: bool,
    pub mermaid: MermaidConfig,
    pub options: HydrateOptions,
}

impl ResolvedConfig {
    /// Merge the config file (explicit or discovered from `cwd`) with
    /// command-line overrides.
    pub fn resolve(args: &Args, cwd: &Utf8Path) -> Result<Self> {
        let config_path = match &args.config {
            Some(path) => Some(cwd.join(path)),
            None => find_config_file(cwd),
        };

        let (root, project) = match config_path {
            Some(path) => {
                tracing::debug!("using config file {path}");
                load_config(&path)?
            }
            None => (cwd.to_owned(), ProjectConfig::default()),
        };

        let input = match (&args.input, &project.input) {
            (Some(flag), _) => cwd.join(flag),
            (None, Some(file)) => root.join(file),
            (None, None) => {
                return Err(eyre!(
                    "no input given: pass --input=PATH or set `input` in {CONFIG_DIR}/{CONFIG_FILE}"
                ));
            }
        };

        let output = match (&args.output, &project.output) {
            (Some(flag), _) => Some(cwd.join(flag)),
            (None, Some(file)) => Some(root.join(file)),
            (None, None) => None,
        };

        let mut mermaid = project.mermaid;
        if let Some(theme) = args.theme {
            mermaid.theme = theme;
        }

        Ok(Self {
            input,
            output,
            script_src: args
                .script_src
                .clone()
                .or(project.script_src)
                .unwrap_or_else(|| DEFAULT_SCRIPT_SRC.to_string()),
            markup_only: args.markup_only || project.markup_only,
            mermaid,
            options: project.blocks,
        })
    }
}

/// Search for `.config/mermaid-hydrate.yaml` walking up from `start`
pub fn find_config_file(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Load a config file, returning the project root alongside it
pub fn load_config(config_path: &Utf8Path) -> Result<(Utf8PathBuf, ProjectConfig)> {
    let content = fs_err::read_to_string(config_path)?;

    let config: ProjectConfig = serde_yaml::from_str(&content)
        .map_err(|e| eyre!("Failed to parse {}: {}", config_path, e))?;

    // Project root is the parent of .config/
    let config_dir = config_path
        .parent()
        .ok_or_else(|| eyre!("Config file has no parent directory"))?;
    let root = match config_dir.file_name() {
        Some(CONFIG_DIR) => config_dir
            .parent()
            .ok_or_else(|| eyre!("{CONFIG_DIR} directory has no parent"))?
            .to_owned(),
        // an explicit --config outside .config/ is relative to its own dir
        _ => config_dir.to_owned(),
    };

    Ok((root, config))
}
