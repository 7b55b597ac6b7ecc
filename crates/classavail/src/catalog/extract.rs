//! Flattens an availability page into the token sequence the assembler reads.

use regex::Regex;
use scraper::{Html, Node};
use std::sync::LazyLock;

/// Lines made only of these characters are kept; everything else is page chrome.
static PRINTABLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9/:,\-'&=(). ]+$").unwrap());

/// Elements whose text is never part of the listing.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "head", "title"];

/// Extracts one token per text run, in document order.
///
/// Whitespace inside a run is collapsed to single spaces and empty runs are
/// dropped, so a blank cell produces no token.
pub fn extract_tokens(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = match node.value() {
                Node::Text(text) => text,
                _ => return None,
            };
            let skipped = node
                .ancestors()
                .filter_map(|a| a.value().as_element())
                .any(|el| SKIPPED_ELEMENTS.contains(&el.name()));
            if skipped {
                return None;
            }

            let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
            PRINTABLE_REGEX.is_match(&line).then_some(line)
        })
        .collect()
}
