//! Scroll-spy: decides which heading the reader is currently inside.

use crate::anchors::AnchorMap;
use crate::outline::HeadingItem;

/// Rows added to the scroll offset before comparing against heading rows, so
/// a heading counts as "in view" slightly before it reaches the very top.
pub const DEFAULT_LOOKAHEAD: u32 = 2;

#[derive(Clone, Debug)]
pub struct ScrollSpy {
    pub lookahead: u32,
    active: Option<String>,
}

impl Default for ScrollSpy {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            active: None,
        }
    }
}

impl ScrollSpy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Optimistic write used by navigation: the clicked entry becomes active
    /// immediately, ahead of the next scroll-driven recomputation.
    pub fn set_active(&mut self, id: impl Into<String>) {
        self.active = Some(id.into());
    }

    /// Recomputes the active section for `scroll_y`. Walks the outline from
    /// last to first so that when several headings are above the threshold,
    /// the one most recently passed wins. Headings missing from the anchor
    /// map are skipped. When nothing qualifies the previous value is kept;
    /// when the outline is empty the active section resets to `None`.
    ///
    /// Returns `true` if the active section changed.
    pub fn update(&mut self, scroll_y: u32, outline: &[HeadingItem], anchors: &AnchorMap) -> bool {
        if outline.is_empty() {
            return self.active.take().is_some();
        }
        let pos = scroll_y.saturating_add(self.lookahead);
        for item in outline.iter().rev() {
            let Some(offset) = anchors.offset(&item.id) else {
                continue;
            };
            if offset <= pos {
                if self.active.as_deref() == Some(item.id.as_str()) {
                    return false;
                }
                self.active = Some(item.id.clone());
                return true;
            }
        }
        false
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::AnchorMap;
    use crate::document::{Document, DocumentOptions};
    use crate::outline::extract_headings;
    use mdtoc_core::theme::Theme;
    use std::sync::Arc;

    // Synthesizes a document whose three headings land at known rows by
    // padding with paragraphs.
    fn fixture() -> (Vec<HeadingItem>, AnchorMap) {
        let mut md = String::from("# First\n\n");
        for _ in 0..20 {
            md.push_str("pad\n\n");
        }
        md.push_str("## Second\n\n");
        for _ in 0..20 {
            md.push_str("pad\n\n");
        }
        md.push_str("### Third\n");
        let outline = extract_headings(&md);
        let doc = Document::parse(Arc::from(md.as_str()), &DocumentOptions::default());
        let lines = doc.layout(60, &Theme::default());
        (outline, AnchorMap::stamp(&lines))
    }

    #[test]
    fn furthest_qualifying_heading_wins() {
        let (outline, anchors) = fixture();
        let second = anchors.offset("second").unwrap();
        let third = anchors.offset("third").unwrap();

        let mut spy = ScrollSpy::new();
        spy.update(0, &outline, &anchors);
        assert_eq!(spy.active(), Some("first"));

        spy.update(second + 3, &outline, &anchors);
        assert_eq!(spy.active(), Some("second"));

        spy.update(third + 10, &outline, &anchors);
        assert_eq!(spy.active(), Some("third"));
    }

    #[test]
    fn lookahead_activates_slightly_early() {
        let (outline, anchors) = fixture();
        let second = anchors.offset("second").unwrap();
        let mut spy = ScrollSpy::new();
        spy.update(second - spy.lookahead, &outline, &anchors);
        assert_eq!(spy.active(), Some("second"));
    }

    #[test]
    fn keeps_previous_value_when_nothing_qualifies() {
        let (outline, anchors) = fixture();
        let mut spy = ScrollSpy::new();
        spy.set_active("second");
        // All anchors sit at rows >= 0 but "first" is at row 0, which always
        // qualifies; use an empty anchor map to model nothing qualifying.
        let changed = spy.update(0, &outline, &AnchorMap::new());
        assert!(!changed);
        assert_eq!(spy.active(), Some("second"));
        let _ = anchors;
    }

    #[test]
    fn empty_outline_resets_to_none() {
        let mut spy = ScrollSpy::new();
        spy.set_active("stale");
        let changed = spy.update(5, &[], &AnchorMap::new());
        assert!(changed);
        assert_eq!(spy.active(), None);
    }

    #[test]
    fn unstamped_headings_are_skipped_not_fatal() {
        let (outline, _) = fixture();
        let mut spy = ScrollSpy::new();
        // Anchor map missing every id: update must not panic or activate.
        assert!(!spy.update(100, &outline, &AnchorMap::new()));
        assert_eq!(spy.active(), None);
    }
}
