//! Compound CSS selectors
//!
//! Only the subset the initializer needs: one compound selector made of an
//! optional type selector (or `*`) followed by any number of `.class` and
//! `#id` parts. Combinators, attribute selectors and pseudo-classes are
//! rejected at parse time so a bad configuration fails loudly instead of
//! silently matching nothing.

use std::fmt;

/// Error returned by [`Selector::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("expected a name after '{0}' in selector '{1}'")]
    MissingName(char, String),

    #[error("unsupported character '{0}' in selector '{1}' (only tag, .class and #id are supported)")]
    Unsupported(char, String),
}

/// A parsed compound selector such as `code.language-mermaid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Lowercased tag name, `None` for `*` or when omitted
    tag: Option<String>,
    classes: Vec<String>,
    id: Option<String>,
    source: String,
}

impl Selector {
    /// Parse a compound selector.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut tag = None;
        let mut classes = Vec::new();
        let mut id = None;

        let mut chars = source.char_indices().peekable();

        // Leading type selector
        if source.starts_with('*') {
            chars.next();
        } else {
            let name = take_name(source, &mut chars);
            if !name.is_empty() {
                tag = Some(name.to_ascii_lowercase());
            }
        }

        while let Some((_, c)) = chars.next() {
            match c {
                '.' | '#' => {
                    let name = take_name(source, &mut chars);
                    if name.is_empty() {
                        return Err(SelectorError::MissingName(c, source.to_string()));
                    }
                    if c == '.' {
                        classes.push(name.to_string());
                    } else {
                        id = Some(name.to_string());
                    }
                }
                other => return Err(SelectorError::Unsupported(other, source.to_string())),
            }
        }

        Ok(Self {
            tag,
            classes,
            id,
            source: source.to_string(),
        })
    }

    /// Tag name this selector requires, if any (lowercase).
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Class names this selector requires.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check an element against this selector.
    ///
    /// `class_attr` is the raw `class` attribute (whitespace separated).
    pub fn matches(&self, tag: &str, id: Option<&str>, class_attr: Option<&str>) -> bool {
        if let Some(want) = &self.tag
            && !want.eq_ignore_ascii_case(tag)
        {
            return false;
        }

        if let Some(want) = &self.id
            && id != Some(want.as_str())
        {
            return false;
        }

        let class_attr = class_attr.unwrap_or("");
        self.classes
            .iter()
            .all(|want| class_attr.split_ascii_whitespace().any(|c| c == want))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Consume identifier characters and return the slice they span.
fn take_name<'a>(
    source: &'a str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'a>>,
) -> &'a str {
    let start = match chars.peek() {
        Some(&(i, _)) => i,
        None => return "",
    };
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            end = i + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }
    &source[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_and_class() {
        let sel = Selector::parse("code.language-mermaid").unwrap();
        assert_eq!(sel.tag(), Some("code"));
        assert_eq!(sel.classes(), &["language-mermaid".to_string()]);
        assert_eq!(sel.to_string(), "code.language-mermaid");
    }

    #[test]
    fn test_parse_class_only_and_universal() {
        let sel = Selector::parse(".mermaid").unwrap();
        assert_eq!(sel.tag(), None);
        assert!(sel.matches("div", None, Some("mermaid")));

        let sel = Selector::parse("*.mermaid").unwrap();
        assert_eq!(sel.tag(), None);
        assert!(sel.matches("pre", None, Some("x mermaid")));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("code."),
            Err(SelectorError::MissingName('.', _))
        ));
        assert!(matches!(
            Selector::parse("pre code"),
            Err(SelectorError::Unsupported(' ', _))
        ));
        assert!(matches!(
            Selector::parse("code[lang=mermaid]"),
            Err(SelectorError::Unsupported('[', _))
        ));
    }

    #[test]
    fn test_matches() {
        let sel = Selector::parse("CODE.language-mermaid").unwrap();
        assert!(sel.matches("code", None, Some("language-mermaid")));
        assert!(sel.matches("Code", None, Some("hljs language-mermaid")));
        // class matching is exact, not prefix
        assert!(!sel.matches("code", None, Some("language-mermaid-ish")));
        assert!(!sel.matches("code", None, Some("Language-Mermaid")));
        assert!(!sel.matches("pre", None, Some("language-mermaid")));
        assert!(!sel.matches("code", None, None));
    }

    #[test]
    fn test_matches_id() {
        let sel = Selector::parse("div#mermaid-0.mermaid").unwrap();
        assert!(sel.matches("div", Some("mermaid-0"), Some("mermaid")));
        assert!(!sel.matches("div", Some("mermaid-1"), Some("mermaid")));
        assert!(!sel.matches("div", None, Some("mermaid")));
    }
}
