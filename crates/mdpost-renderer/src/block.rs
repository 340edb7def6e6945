//! Line-scanning block parser.
//!
//! A single left-to-right pass over the document lines with one piece
//! of mutable state: whether an unordered list is currently open. A
//! contiguous run of list items is wrapped in one `<ul>` container;
//! any other block type closes the open container first.

use std::sync::LazyLock;

use regex::Regex;

use crate::inline::format_inline;

/// Placeholder tokens emitted by the asset resolver pass through as
/// opaque whole lines.
static PLACEHOLDER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ASSET_PLACEHOLDER_\d+$").unwrap());

/// List marker followed by at least one whitespace character. A bare
/// `-` or `*` falls through to paragraph classification.
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*][ \t]").unwrap());

/// Options collapsing the historical renderer variants.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    /// Keep blank source lines as blank output lines.
    pub preserve_blank_lines: bool,
}

/// Block parser producing an ordered sequence of HTML block fragments.
pub(crate) struct BlockParser {
    options: RenderOptions,
}

impl BlockParser {
    pub(crate) fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Parse a document body into HTML block fragments.
    ///
    /// Classification priority: placeholder passthrough, headings,
    /// thematic break, blockquote, list item, blank, paragraph. A line
    /// is never classified as more than one block type.
    pub(crate) fn parse(&self, body: &str) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut inside_list = false;

        for line in body.lines() {
            let trimmed = line.trim();

            if PLACEHOLDER_LINE.is_match(trimmed) {
                close_list(&mut blocks, &mut inside_list);
                blocks.push(trimmed.to_owned());
            } else if let Some(rest) = line.strip_prefix("### ") {
                close_list(&mut blocks, &mut inside_list);
                blocks.push(format!("<h3>{}</h3>", format_inline(rest.trim())));
            } else if let Some(rest) = line.strip_prefix("## ") {
                close_list(&mut blocks, &mut inside_list);
                blocks.push(format!("<h2>{}</h2>", format_inline(rest.trim())));
            } else if let Some(rest) = line.strip_prefix("# ") {
                close_list(&mut blocks, &mut inside_list);
                blocks.push(format!("<h1>{}</h1>", format_inline(rest.trim())));
            } else if trimmed == "---" || trimmed == "***" {
                close_list(&mut blocks, &mut inside_list);
                blocks.push("<hr>".to_owned());
            } else if let Some(rest) = line.strip_prefix("> ") {
                close_list(&mut blocks, &mut inside_list);
                blocks.push(format!(
                    "<blockquote><p>{}</p></blockquote>",
                    format_inline(rest.trim())
                ));
            } else if LIST_ITEM.is_match(line) {
                if !inside_list {
                    blocks.push("<ul>".to_owned());
                    inside_list = true;
                }
                blocks.push(format!("<li>{}</li>", format_inline(line[2..].trim())));
            } else if trimmed.is_empty() {
                close_list(&mut blocks, &mut inside_list);
                if self.options.preserve_blank_lines {
                    blocks.push(String::new());
                }
            } else {
                close_list(&mut blocks, &mut inside_list);
                let formatted = format_inline(trimmed);
                // A line that held only a now-deleted image reference
                // formats to nothing and emits no paragraph.
                if !formatted.is_empty() {
                    blocks.push(format!("<p>{formatted}</p>"));
                }
            }
        }

        close_list(&mut blocks, &mut inside_list);
        blocks
    }
}

fn close_list(blocks: &mut Vec<String>, inside_list: &mut bool) {
    if *inside_list {
        blocks.push("</ul>".to_owned());
        *inside_list = false;
    }
}
