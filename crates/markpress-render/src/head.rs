//! Page head extraction from the root index frontmatter.
//!
//! The root `index.md` may carry a `config` block:
//!
//! ```yaml
//! ---
//! config:
//!   siteName: My Site
//!   meta:
//!     description: A site
//!     keywords: [docs, markdown]
//!   cssLinks:
//!     - /style.css
//! ---
//! ```
//!
//! which becomes a title, one meta tag per `meta` entry and one stylesheet
//! link per `cssLinks` entry.

use std::fmt::Write;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::RenderError;
use crate::frontmatter::parse_frontmatter;

/// Title used when the root index has no `config.siteName`.
pub const DEFAULT_TITLE: &str = "MarkPress";

/// How the head fragment is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadOptions {
    /// Title used when no site name is configured.
    pub default_title: String,
    /// HTML-escape title, meta and link values.
    ///
    /// When disabled, frontmatter values are inserted verbatim and may inject
    /// arbitrary markup into the page.
    pub escape: bool,
}

impl Default for HeadOptions {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_owned(),
            escape: true,
        }
    }
}

impl HeadOptions {
    /// Options that insert frontmatter values without escaping.
    #[must_use]
    pub fn verbatim() -> Self {
        Self {
            escape: false,
            ..Self::default()
        }
    }
}

/// A `<meta name=.. content=..>` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaTag {
    /// Meta name.
    pub name: String,
    /// Meta content; list values are joined with commas.
    pub content: String,
}

/// Head metadata derived from frontmatter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageHead {
    /// Page title.
    pub title: String,
    /// Meta tags in frontmatter order.
    pub meta_tags: Vec<MetaTag>,
    /// Stylesheet URLs in frontmatter order.
    pub stylesheet_links: Vec<String>,
}

/// The `config` block as written in frontmatter.
///
/// Fields are kept as raw YAML so that one badly typed field does not
/// discard the others.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSiteConfig {
    site_name: Option<Value>,
    meta: Option<Value>,
    css_links: Option<Value>,
}

impl PageHead {
    /// Head with only the default title.
    #[must_use]
    pub fn fallback(options: &HeadOptions) -> Self {
        Self {
            title: options.default_title.clone(),
            meta_tags: Vec::new(),
            stylesheet_links: Vec::new(),
        }
    }

    /// Build head metadata from parsed frontmatter data.
    ///
    /// Missing or non-mapping data, or a missing `config` mapping, yields
    /// [`PageHead::fallback`].
    #[must_use]
    pub fn from_frontmatter(data: Option<&Value>, options: &HeadOptions) -> Self {
        let Some(config) = data
            .and_then(|d| d.get("config"))
            .and_then(|c| serde_yaml::from_value::<RawSiteConfig>(c.clone()).ok())
        else {
            return Self::fallback(options);
        };

        let title = config
            .site_name
            .as_ref()
            .and_then(scalar_to_string)
            .unwrap_or_else(|| options.default_title.clone());

        let meta_tags = match &config.meta {
            Some(Value::Mapping(mapping)) => mapping
                .iter()
                .filter_map(|(name, value)| meta_tag(name, value))
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                tracing::warn!("Ignoring config.meta: expected a mapping");
                Vec::new()
            }
        };

        let stylesheet_links = match &config.css_links {
            Some(Value::Sequence(links)) => links.iter().filter_map(scalar_to_string).collect(),
            Some(Value::String(link)) => vec![link.clone()],
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                tracing::warn!("Ignoring config.cssLinks: expected a list");
                Vec::new()
            }
        };

        Self {
            title,
            meta_tags,
            stylesheet_links,
        }
    }

    /// Render as newline-separated title, meta and link tags.
    #[must_use]
    pub fn to_html(&self, escape: bool) -> String {
        let esc = |s: &str| {
            if escape {
                escape_html(s)
            } else {
                s.to_owned()
            }
        };

        let mut html = format!("<title>{}</title>", esc(&self.title));
        for tag in &self.meta_tags {
            let _ = write!(
                html,
                "\n<meta name=\"{}\" content=\"{}\"/>",
                esc(&tag.name),
                esc(&tag.content)
            );
        }
        for href in &self.stylesheet_links {
            let _ = write!(html, "\n<link rel=\"stylesheet\" href=\"{}\" />", esc(href));
        }
        html
    }
}

/// Read `path` and build its head fragment.
///
/// The file is read synchronously. Missing or malformed frontmatter is not
/// an error and produces the fallback title.
///
/// # Errors
///
/// Returns [`RenderError::FileNotFound`] or [`RenderError::Io`] if the file
/// cannot be read.
pub fn extract_head_fragment(path: &Path, options: &HeadOptions) -> Result<String, RenderError> {
    let text =
        std::fs::read_to_string(path).map_err(|e| RenderError::from_io(path.to_path_buf(), e))?;
    let doc = parse_frontmatter(&text);
    let head = PageHead::from_frontmatter(doc.data.as_ref(), options);
    Ok(head.to_html(options.escape))
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Build a meta tag from one `config.meta` entry.
fn meta_tag(name: &Value, value: &Value) -> Option<MetaTag> {
    let name = scalar_to_string(name)?;
    let content = match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => {
            let Some(content) = scalar_to_string(other) else {
                tracing::warn!(name = %name, "Skipping meta entry with non-scalar value");
                return None;
            };
            content
        }
    };
    Some(MetaTag { name, content })
}

/// Stringify a YAML scalar; `None` for null, sequences and mappings.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
