//! Build-time host for mermaid-hydrate
//!
//! Runs the initializer over generated HTML (typically a static site's
//! output directory) so pages ship with `div.mermaid` targets and a mermaid
//! bootstrap instead of raw `language-mermaid` code blocks.

pub mod args;
pub mod config;
pub mod process;

pub use args::Args;
pub use config::{ProjectConfig, ResolvedConfig};
pub use process::{Summary, collect_html_files, process_html, run};
