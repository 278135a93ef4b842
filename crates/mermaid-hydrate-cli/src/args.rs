//! Command-line arguments

use camino::Utf8PathBuf;
use clap::Parser;
use mermaid_hydrate::Theme;

/// Converts `<pre><code class="language-mermaid">` blocks in HTML files into
/// mermaid diagram targets and embeds the mermaid bootstrap.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mermaid-hydrate", version, about, long_about = None)]
pub struct Args {
    /// HTML file or directory to process
    #[arg(short, long)]
    pub input: Option<Utf8PathBuf>,

    /// Write results here instead of in place
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,

    /// Config file (default: .config/mermaid-hydrate.yaml, searched upwards)
    #[arg(short, long)]
    pub config: Option<Utf8PathBuf>,

    /// Mermaid bundle to reference
    #[arg(long)]
    pub script_src: Option<String>,

    /// default, dark, forest, neutral or base
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Rewrite markup but don't embed any script
    #[arg(long)]
    pub markup_only: bool,

    /// Don't write anything; fail if a file would change
    #[arg(long)]
    pub check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("mermaid-hydrate").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = parse(&[
            "--input=public",
            "--output",
            "dist",
            "--theme=forest",
            "--script-src",
            "/m.js",
            "--check",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Utf8Path::new("public")));
        assert_eq!(args.output.as_deref(), Some(Utf8Path::new("dist")));
        assert_eq!(args.theme, Some(Theme::Forest));
        assert_eq!(args.script_src.as_deref(), Some("/m.js"));
        assert!(args.check);
        assert!(!args.markup_only);
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&["-i", "public", "-c", "site.yaml", "--markup-only"]).unwrap();
        assert_eq!(args.input.as_deref(), Some(Utf8Path::new("public")));
        assert_eq!(args.config.as_deref(), Some(Utf8Path::new("site.yaml")));
        assert!(args.markup_only);
    }

    #[test]
    fn test_rejects_unknown_and_bad_theme() {
        assert!(parse(&["--inptu=x"]).is_err());
        assert!(parse(&["public"]).is_err());
        assert!(parse(&["--theme=pink"]).is_err());
    }
}
