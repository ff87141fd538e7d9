//! YAML frontmatter splitting.
//!
//! A frontmatter block starts on the first line of the file with `---` and
//! ends at the next line consisting only of `---`. Anything else is body.

use serde_yaml::Value;

/// Frontmatter delimiter line.
const DELIMITER: &str = "---";

/// A markdown document split into frontmatter data and body.
#[derive(Clone, Debug, PartialEq)]
pub struct Frontmatter<'a> {
    /// Markdown body with the frontmatter block removed.
    pub content: &'a str,
    /// Parsed frontmatter, `None` if absent, empty or not valid YAML.
    pub data: Option<Value>,
}

/// Split `text` into frontmatter data and markdown body.
///
/// Malformed YAML is logged and treated as no frontmatter data; the block is
/// still removed from the body. An unterminated block is left in the body.
pub fn parse_frontmatter(text: &str) -> Frontmatter<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = strip_opening_delimiter(text) else {
        return Frontmatter {
            content: text,
            data: None,
        };
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return Frontmatter {
                content: &rest[offset + line.len()..],
                data: parse_yaml(&rest[..offset]),
            };
        }
        offset += line.len();
    }

    Frontmatter {
        content: text,
        data: None,
    }
}

/// Strip the opening `---` line, returning the rest of the text.
fn strip_opening_delimiter(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(DELIMITER)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Parse the YAML between the delimiters.
fn parse_yaml(yaml: &str) -> Option<Value> {
    if yaml.trim().is_empty() {
        return None;
    }
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed frontmatter");
            None
        }
    }
}
