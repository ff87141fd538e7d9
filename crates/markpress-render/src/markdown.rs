//! Markdown body conversion.

use pulldown_cmark::{Options, Parser, html};

/// Markdown extensions enabled for body conversion.
///
/// The default enables the GitHub Flavored Markdown set (tables,
/// strikethrough, task lists) and leaves the rest off.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct MarkdownOptions {
    /// Pipe tables.
    pub tables: bool,
    /// `~~strikethrough~~`.
    pub strikethrough: bool,
    /// `- [ ] task` list items.
    pub tasklists: bool,
    /// `[^note]` footnotes.
    pub footnotes: bool,
    /// Curly quotes, dashes and ellipses.
    pub smart_punctuation: bool,
    /// `# Heading {#id .class}` attributes.
    pub heading_attributes: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            footnotes: false,
            smart_punctuation: false,
            heading_attributes: false,
        }
    }
}

impl MarkdownOptions {
    /// Options with every extension disabled (plain `CommonMark`).
    #[must_use]
    pub fn commonmark() -> Self {
        Self {
            tables: false,
            strikethrough: false,
            tasklists: false,
            footnotes: false,
            smart_punctuation: false,
            heading_attributes: false,
        }
    }

    /// Parser options for these settings.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_SMART_PUNCTUATION, self.smart_punctuation);
        options.set(Options::ENABLE_HEADING_ATTRIBUTES, self.heading_attributes);
        options
    }
}

/// Convert a markdown body to HTML.
pub fn render_markdown(body: &str, options: &MarkdownOptions) -> String {
    let parser = Parser::new_ext(body, options.parser_options());
    let mut output = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}
