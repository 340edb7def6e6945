//! Inline markdown span formatting.
//!
//! Converts inline spans (code, strong, emphasis, links, bare URLs)
//! inside a single line of text into HTML fragments. Each rule is an
//! independent regex substitution applied in a fixed order; output of
//! an earlier rule is visible to later rules, which is accepted
//! behavior rather than a bug. Callers must invoke [`format_inline`]
//! exactly once per logical text run.

use std::sync::LazyLock;

use regex::Regex;

static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static STRONG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());

static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.+?)\]\((.+?)\)").unwrap());

/// Bare URLs not preceded by a quote, parenthesis or bracket.
///
/// The regex crate has no lookbehind, so the preceding character is
/// captured and re-emitted in the replacement.
static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(^|[^"'(\[])(https?://[^\s<]+)"#).unwrap());

/// Escape `&`, `<` and `>` for safe embedding in HTML text content.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Format inline markdown spans within a single line of text.
///
/// Rules, in order: code spans, strong emphasis, emphasis, explicit
/// links, bare-URL autolinking. Code spans run first so their content
/// is not re-interpreted by the emphasis rules; strong runs before
/// emphasis so `**` is not partially consumed by the single-`*` rule.
/// Code-span content is HTML-escaped before wrapping.
///
/// Nested or overlapping emphasis spans (e.g. `*a **b** c*`) are not
/// handled predictably; that behavior is undefined.
#[must_use]
pub fn format_inline(text: &str) -> String {
    let text = CODE_SPAN.replace_all(text, |caps: &regex::Captures<'_>| {
        format!("<code>{}</code>", escape_html(&caps[1]))
    });
    let text = STRONG.replace_all(&text, "<strong>$1</strong>");
    let text = EMPHASIS.replace_all(&text, "<em>$1</em>");
    let text = LINK.replace_all(&text, r#"<a href="$2">$1</a>"#);
    let text = BARE_URL.replace_all(&text, r#"$1<a href="$2">$2</a>"#);
    text.into_owned()
}
