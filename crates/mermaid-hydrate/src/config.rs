//! Options for the diagram library and for the initialization pass

use std::fmt;

use serde::{Deserialize, Serialize};

/// Visual theme understood by mermaid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Forest,
    Neutral,
    Base,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Dark => "dark",
            Theme::Forest => "forest",
            Theme::Neutral => "neutral",
            Theme::Base => "base",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Theme::Default),
            "dark" => Ok(Theme::Dark),
            "forest" => Ok(Theme::Forest),
            "neutral" => Ok(Theme::Neutral),
            "base" => Ok(Theme::Base),
            other => Err(format!(
                "unknown theme '{other}' (expected default, dark, forest, neutral or base)"
            )),
        }
    }
}

/// How much mermaid trusts the diagram text.
///
/// `Loose` allows HTML tags and click handlers inside diagrams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    Strict,
    #[default]
    Loose,
    Antiscript,
    Sandbox,
}

impl SecurityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SecurityLevel::Strict => "strict",
            SecurityLevel::Loose => "loose",
            SecurityLevel::Antiscript => "antiscript",
            SecurityLevel::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The option set handed to `mermaid.initialize`.
///
/// Field names serialize in the library's own camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MermaidConfig {
    /// Let the library render on its own load event. Always off here: the
    /// initializer triggers rendering itself once the markup is in place.
    pub start_on_load: bool,
    pub theme: Theme,
    pub security_level: SecurityLevel,
}

impl Default for MermaidConfig {
    fn default() -> Self {
        Self {
            start_on_load: false,
            theme: Theme::Default,
            security_level: SecurityLevel::Loose,
        }
    }
}

impl MermaidConfig {
    /// JSON object literal for embedding in a script.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// What to look for and what to build in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HydrateOptions {
    /// Marker for diagram source blocks
    pub selector: String,
    /// Tag of the replacement container
    pub container_tag: String,
    /// Class the diagram library scans for
    pub class_name: String,
    /// Replacement ids are `{id_prefix}{index}`
    pub id_prefix: String,
}

impl Default for HydrateOptions {
    fn default() -> Self {
        Self {
            selector: "code.language-mermaid".to_string(),
            container_tag: "div".to_string(),
            class_name: "mermaid".to_string(),
            id_prefix: "mermaid-".to_string(),
        }
    }
}

impl HydrateOptions {
    /// Identifier of the `index`-th replacement.
    pub fn id_for(&self, index: usize) -> String {
        format!("{}{}", self.id_prefix, index)
    }
}
