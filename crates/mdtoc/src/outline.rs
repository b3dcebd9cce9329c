//! Heading extraction and slug generation.
//!
//! The outline is built from the *raw* markdown source with a line-oriented
//! scanner, independent of how the document later renders. Ids come from
//! [`slug`], the same function the anchor map uses when stamping rendered
//! heading rows, so the TOC and the document can never disagree on an id.

use std::sync::Arc;

/// One TOC entry. `id` is derived from `text` alone; two headings whose text
/// normalizes to the same slug will collide, and collisions are not resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingItem {
    pub level: u8,
    pub text: String,
    pub id: String,
}

/// Derives a URL-safe identifier from heading text.
///
/// Lowercases the input and keeps ASCII alphanumerics plus CJK Unified
/// Ideographs (U+4E00..=U+9FA5); every maximal run of anything else collapses
/// to a single `-`, and the result carries no leading or trailing `-`.
pub fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        for lc in ch.to_lowercase() {
            if lc.is_ascii_alphanumeric() || ('\u{4e00}'..='\u{9fa5}').contains(&lc) {
                if pending_hyphen && !out.is_empty() {
                    out.push('-');
                }
                pending_hyphen = false;
                out.push(lc);
            } else {
                pending_hyphen = true;
            }
        }
    }
    out
}

/// Scans `source` line by line for headings of level 1..=3.
///
/// A line matches iff it starts with one to three `#`, followed by at least
/// one space or tab, followed by non-blank text. Four or more `#` never
/// match. This is a heading detector, not a markdown parser; fenced code
/// blocks are not recognized (matching the upstream behavior).
pub fn extract_headings(source: &str) -> Vec<HeadingItem> {
    source.lines().filter_map(parse_heading_line).collect()
}

fn parse_heading_line(line: &str) -> Option<HeadingItem> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 3 {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some(HeadingItem {
        level: level as u8,
        text: text.to_string(),
        id: slug(text),
    })
}

/// Memoized outline for a source snapshot.
///
/// Re-syncing with the same `Arc<str>` (pointer identity) is a no-op, so the
/// document is not re-scanned on unrelated UI updates.
#[derive(Clone, Debug, Default)]
pub struct Outline {
    source: Option<Arc<str>>,
    items: Vec<HeadingItem>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(&mut self, source: &Arc<str>) {
        if self
            .source
            .as_ref()
            .is_some_and(|prev| Arc::ptr_eq(prev, source))
        {
            return;
        }
        self.items = extract_headings(source);
        self.source = Some(source.clone());
    }

    pub fn clear(&mut self) {
        self.source = None;
        self.items.clear();
    }

    pub fn items(&self) -> &[HeadingItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
