//! HTML format implementation
//!
//! This module implements HTML import: externally authored documents (word
//! processor exports converted to HTML upstream, pasted markup) become editor
//! values. There is no HTML export; rendering is the front end's job.
//!
//! # Library Choice
//!
//! We use the `html5ever` + `rcdom` ecosystem for HTML parsing:
//! - `html5ever`: Browser-grade HTML5 parser from the Servo project
//! - `markup5ever_rcdom`: Reference-counted DOM tree implementation
//!
//! The parser handles malformed HTML the way browsers do, so unclosed tags and
//! stray end tags never reach the mapping code.
//!
//! # Element Mapping Table
//!
//! | HTML                                   | Editor                              | Notes                                   |
//! |----------------------------------------|-------------------------------------|-----------------------------------------|
//! | `<p>`                                  | paragraph                           |                                         |
//! | `<h1>`–`<h6>`                          | heading, level 1–6                  |                                         |
//! | `<ul>` / `<ol>`                        | list, bulleted / numbered           | nested lists join the previous item     |
//! | `<li>`                                 | listItem                            | content wrapped in paragraphs           |
//! | `<blockquote>`                         | blockquote                          |                                         |
//! | `<hr>`                                 | thematicBreak                       |                                         |
//! | `<pre>`                                | code                                | language from a `language-*` class      |
//! | `<a href>`                             | link                                | relative targets resolved on `base_url` |
//! | `<br>`                                 | `"\n"` leaf                         | spliced into the parent                 |
//! | `<strong>`, `<b>`                      | strong mark                         | `font-weight:normal` wrapper unwrapped  |
//! | `<em>`, `<i>`                          | emphasis mark                       |                                         |
//! | `<u>`, `<ins>`                         | underline mark                      |                                         |
//! | `<s>`, `<strike>`, `<del>`             | strikethrough mark                  |                                         |
//! | `<mark>`                               | highlight mark                      |                                         |
//! | `<code>`                               | code mark                           | outside `<pre>`                         |
//! | `style="..."`                          | strong/emphasis/underline/strike    | when `style_marks` is on                |
//! | `<script>`, `<style>`, `<head>`, ...   | dropped with content                |                                         |
//! | anything else                          | unwrapped                           | children hoisted into the parent        |
//!
//! # Lossy Conversions
//!
//! - Classes, ids, tables, images and media are not carried over.
//! - Lists inside blockquotes are flattened into the quote.
//! - Blocks nested in paragraphs, headings or links keep only their text.

mod parser;

pub use parser::{import_html, tag_rule, ImportOptions, TagRule, DROPPED_TAGS, TAG_TABLE};

use crate::editor::EditorNode;
use crate::error::FormatError;
use crate::format::Format;

/// Format implementation for HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: ImportOptions,
}

impl HtmlFormat {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML import (word-processor exports, pasted markup)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<EditorNode>, FormatError> {
        import_html(source, &self.options)
    }
}
